//! Controller identity.

use std::any::TypeId;
use std::fmt;

/// Identifies a controller by its Rust type.
///
/// ```
/// use tenet_registry::ControllerKey;
///
/// struct Users;
/// struct Orders;
///
/// assert_eq!(ControllerKey::of::<Users>(), ControllerKey::of::<Users>());
/// assert_ne!(ControllerKey::of::<Users>(), ControllerKey::of::<Orders>());
/// assert_eq!(ControllerKey::of::<Users>().name(), "Users");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl ControllerKey {
    /// The key for controller type `C`.
    #[must_use]
    pub fn of<C: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            type_name: std::any::type_name::<C>(),
        }
    }

    /// Short type name, without the module path.
    #[must_use]
    pub fn name(&self) -> &'static str {
        let path = self.type_name.split('<').next().unwrap_or(self.type_name);
        path.rsplit("::").next().unwrap_or(path)
    }

    /// Fully qualified type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for ControllerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ControllerKey").field(&self.type_name).finish()
    }
}

impl fmt::Display for ControllerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod nested {
        pub struct Accounts<T>(pub T);
    }

    #[test]
    fn test_name_strips_module_path_and_generics() {
        let key = ControllerKey::of::<nested::Accounts<u8>>();
        assert_eq!(key.name(), "Accounts");
        assert!(key.type_name().contains("nested::Accounts"));
        assert_eq!(key.to_string(), "Accounts");
    }
}
