//! # Access Gate
//!
//! Holds the single administrative principal and authorizes catalog
//! mutation. The gate is constructed once with its initial principal; there
//! is no way to build a gate without one, and no way to re-initialize it.
//!
//! Authority moves only when the current holder names a successor. Past
//! principals are not retained.

use serde::{Deserialize, Serialize};

use shelf_core::{LedgerError, Principal};

/// Authorization guard for administrative operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessGate {
    admin: Principal,
}

impl AccessGate {
    /// Create the gate with its initial administrative principal.
    pub fn initialize(admin: Principal) -> Self {
        Self { admin }
    }

    /// The current administrative principal.
    pub fn admin(&self) -> &Principal {
        &self.admin
    }

    /// Fail with `Unauthorized` unless `caller` is the administrative principal.
    pub fn authorize(&self, caller: &Principal) -> Result<(), LedgerError> {
        if caller != &self.admin {
            return Err(LedgerError::Unauthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    /// Hand administrative authority to `successor`, returning the previous holder.
    pub fn transfer(
        &mut self,
        caller: &Principal,
        successor: Principal,
    ) -> Result<Principal, LedgerError> {
        self.authorize(caller)?;
        Ok(std::mem::replace(&mut self.admin, successor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AccessGate {
        AccessGate::initialize(Principal::new("librarian"))
    }

    #[test]
    fn test_admin_is_authorized() {
        assert!(gate().authorize(&Principal::new("librarian")).is_ok());
    }

    #[test]
    fn test_other_principal_is_rejected() {
        let err = gate().authorize(&Principal::new("alice")).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Unauthorized {
                caller: Principal::new("alice")
            }
        );
    }

    #[test]
    fn test_transfer_moves_authority() {
        let mut gate = gate();
        let previous = gate
            .transfer(&Principal::new("librarian"), Principal::new("curator"))
            .unwrap();
        assert_eq!(previous, Principal::new("librarian"));
        assert_eq!(gate.admin(), &Principal::new("curator"));
        assert!(gate.authorize(&Principal::new("librarian")).is_err());
        assert!(gate.authorize(&Principal::new("curator")).is_ok());
    }

    #[test]
    fn test_transfer_by_non_admin_leaves_gate_unchanged() {
        let mut gate = gate();
        let result = gate.transfer(&Principal::new("alice"), Principal::new("alice"));
        assert!(result.is_err());
        assert_eq!(gate.admin(), &Principal::new("librarian"));
    }

    #[test]
    fn test_transfer_to_self_is_allowed() {
        let mut gate = gate();
        gate.transfer(&Principal::new("librarian"), Principal::new("librarian"))
            .unwrap();
        assert_eq!(gate.admin(), &Principal::new("librarian"));
    }
}
