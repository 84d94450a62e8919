//! Sheet lifecycle bookkeeping.
//!
//! ```text
//! Unregistered --register--> Registered --apply--> Active --detach--> Detached
//!                                 ^                  |  ^                |
//!                                 |                update                |
//!                                 +----------------register/apply--------+
//! ```
//!
//! `enable` and `disable` act on the live rule list and never change the
//! state; they only require it to be `Active`.

use crate::error::{SheetError, SheetResult};
use crate::ids::SheetId;

/// Where a sheet handle is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum SheetState {
    /// Constructed; no style element exists yet.
    #[default]
    Unregistered,
    /// A style element and a snapshot exist, but nothing is in the document.
    Registered,
    /// The style element is in the document head and kept in sync.
    Active,
    /// Removed from the document; may be registered again.
    Detached,
}

impl SheetState {
    pub const fn is_registered(self) -> bool {
        matches!(self, Self::Registered | Self::Active)
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether a style element must be created before the sheet can go live.
    pub const fn needs_registration(self) -> bool {
        matches!(self, Self::Unregistered | Self::Detached)
    }
}

/// Operations that are checked against the lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Operation {
    Register,
    Apply,
    Update,
    Detach,
    Enable,
    Disable,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Apply => "apply",
            Self::Update => "update",
            Self::Detach => "detach",
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }

    /// The state after this operation completes from `from`.
    pub const fn next_state(self, from: SheetState) -> SheetState {
        match self {
            Self::Register => match from {
                SheetState::Unregistered | SheetState::Detached => SheetState::Registered,
                SheetState::Registered | SheetState::Active => from,
            },
            Self::Apply => SheetState::Active,
            Self::Detach => SheetState::Detached,
            Self::Update | Self::Enable | Self::Disable => from,
        }
    }
}

/// Tracks the state of one sheet and rejects out-of-order operations.
#[derive(Clone, Debug)]
pub struct Lifecycle {
    id: SheetId,
    state: SheetState,
}

impl Lifecycle {
    pub const fn new(id: SheetId) -> Self {
        Self {
            id,
            state: SheetState::Unregistered,
        }
    }

    pub const fn id(&self) -> &SheetId {
        &self.id
    }

    pub const fn state(&self) -> SheetState {
        self.state
    }

    /// Check that `operation` may run in the current state.
    ///
    /// # Errors
    /// - [`SheetError::AlreadyApplied`] for `apply` on an active sheet
    /// - [`SheetError::NotApplied`] for `update`, `detach`, `enable` and
    ///   `disable` on a sheet that is not active
    pub fn permits(&self, operation: Operation) -> SheetResult<()> {
        let active = self.state.is_active();
        match operation {
            Operation::Apply if active => Err(SheetError::AlreadyApplied {
                id: self.id.clone(),
            }),
            Operation::Update | Operation::Detach | Operation::Enable | Operation::Disable
                if !active =>
            {
                Err(SheetError::NotApplied {
                    id: self.id.clone(),
                    operation: operation.as_str(),
                })
            }
            Operation::Register
            | Operation::Apply
            | Operation::Update
            | Operation::Detach
            | Operation::Enable
            | Operation::Disable => Ok(()),
        }
    }

    /// Record that `operation` finished successfully.
    pub fn complete(&mut self, operation: Operation) {
        self.state = operation.next_state(self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lifecycle() -> Lifecycle {
        Lifecycle::new(SheetId::from("test"))
    }

    #[test]
    fn full_cycle_returns_to_registrable_state() -> SheetResult<()> {
        let mut sheet = lifecycle();
        for operation in [Operation::Register, Operation::Apply, Operation::Update, Operation::Detach] {
            sheet.permits(operation)?;
            sheet.complete(operation);
        }
        assert_eq!(sheet.state(), SheetState::Detached);
        assert!(sheet.state().needs_registration());
        sheet.permits(Operation::Apply)?;
        Ok(())
    }

    #[test]
    fn register_is_idempotent() {
        let mut sheet = lifecycle();
        sheet.complete(Operation::Register);
        sheet.complete(Operation::Register);
        assert_eq!(sheet.state(), SheetState::Registered);
        sheet.complete(Operation::Apply);
        sheet.complete(Operation::Register);
        assert_eq!(sheet.state(), SheetState::Active);
    }

    #[test]
    fn applying_twice_is_rejected() {
        let mut sheet = lifecycle();
        sheet.complete(Operation::Apply);
        assert!(matches!(
            sheet.permits(Operation::Apply),
            Err(SheetError::AlreadyApplied { .. })
        ));
    }

    #[test]
    fn live_only_operations_need_an_active_sheet() {
        let mut sheet = lifecycle();
        sheet.complete(Operation::Register);
        for operation in [Operation::Update, Operation::Detach, Operation::Enable, Operation::Disable] {
            let err = sheet.permits(operation);
            assert!(
                matches!(err, Err(SheetError::NotApplied { operation: name, .. }) if name == operation.as_str())
            );
        }
    }

    #[test]
    fn toggling_keeps_the_state() {
        assert_eq!(Operation::Disable.next_state(SheetState::Active), SheetState::Active);
        assert_eq!(Operation::Enable.next_state(SheetState::Active), SheetState::Active);
    }
}
