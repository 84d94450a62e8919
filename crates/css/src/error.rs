use crate::ids::SheetId;
use thiserror::Error;

/// Result alias for stylesheet operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Errors reported by stylesheet handles and the reconciler.
#[derive(Debug, Error)]
pub enum SheetError {
    /// `apply` was called on a sheet that is already live in its document.
    #[error("stylesheet `{id}` has already been applied; use update() or detach() first")]
    AlreadyApplied { id: SheetId },

    /// An operation that needs a live sheet ran before `apply` or after `detach`.
    #[error("can't {operation} the unapplied stylesheet `{id}`; apply it first using apply()")]
    NotApplied {
        id: SheetId,
        operation: &'static str,
    },

    /// The live rule list has no rule for a selector the last applied state had.
    #[error(
        "no rule for selector `{selector}` in the live rule list; the document diverged from the last applied state"
    )]
    RuleNotFound { selector: String },

    /// A change adds a rule for a selector the live rule list already has.
    #[error("selector `{selector}` already has a rule in the live rule list")]
    RuleExists { selector: String },

    /// A change refers to a selector the current model does not contain.
    #[error("selector `{selector}` is not part of the current model")]
    MissingSelector { selector: String },

    /// A change refers to a property the current model does not declare.
    #[error("property `{property}` of selector `{selector}` is not part of the current model")]
    MissingProperty { selector: String, property: String },

    /// A registered processor failed.
    #[error("processor `{name}` failed")]
    Processor {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// The host document rejected an operation.
    #[error("host document operation failed: {0:#}")]
    Host(#[from] anyhow::Error),
}

impl SheetError {
    /// Whether this error comes from calling an operation in the wrong lifecycle state.
    pub const fn is_usage_error(&self) -> bool {
        matches!(self, Self::AlreadyApplied { .. } | Self::NotApplied { .. })
    }

    /// Whether this error means the live rule list no longer matches the model.
    pub const fn is_divergence(&self) -> bool {
        matches!(
            self,
            Self::RuleNotFound { .. }
                | Self::RuleExists { .. }
                | Self::MissingSelector { .. }
                | Self::MissingProperty { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn lifecycle_messages_name_the_sheet_and_operation() {
        let err = SheetError::NotApplied {
            id: SheetId::from("menu"),
            operation: "update",
        };
        assert_eq!(
            err.to_string(),
            "can't update the unapplied stylesheet `menu`; apply it first using apply()"
        );
        assert!(err.is_usage_error());
        assert!(!err.is_divergence());
    }

    #[test]
    fn duplicate_rules_count_as_divergence() {
        let err = SheetError::RuleExists {
            selector: ".a".into(),
        };
        assert!(err.is_divergence());
        assert!(!err.is_usage_error());
    }

    #[test]
    fn host_errors_keep_their_context() {
        let err = SheetError::from(anyhow!("index 4 out of range").context("deleteRule"));
        assert_eq!(err.to_string(), "host document operation failed: deleteRule: index 4 out of range");
    }
}
