use permit_types::{RequiredPermissions, ValidationError};
use serde::Serialize;

/// A permission requirement attached to a guarded operation.
///
/// Carries the required codes, the mode, and optionally the name of the
/// parameter holding the subject for contextual checks. Validated when built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PermissionDeclaration {
    required: RequiredPermissions,
    subject_param: Option<String>,
}

impl PermissionDeclaration {
    pub fn new(
        required: RequiredPermissions,
        subject_param: Option<String>,
    ) -> permit_types::Result<Self> {
        if let Some(param) = &subject_param {
            if param.trim().is_empty() {
                return Err(ValidationError::EmptySubjectParameter);
            }
        }
        Ok(Self {
            required,
            subject_param,
        })
    }

    /// Declaration without a subject
    pub fn require(required: RequiredPermissions) -> Self {
        Self {
            required,
            subject_param: None,
        }
    }

    /// Build from raw codes, a textual mode and an optional subject parameter
    pub fn parse<I, S>(
        codes: I,
        mode: &str,
        subject_param: Option<&str>,
    ) -> permit_types::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let required = RequiredPermissions::parse(codes, mode)?;
        Self::new(required, subject_param.map(String::from))
    }

    pub fn with_subject(self, param: impl Into<String>) -> permit_types::Result<Self> {
        Self::new(self.required, Some(param.into()))
    }

    pub fn required(&self) -> &RequiredPermissions {
        &self.required
    }

    pub fn subject_param(&self) -> Option<&str> {
        self.subject_param.as_deref()
    }
}

/// An operation and every declaration stacked on it.
///
/// Declarations are checked in order and all must pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GuardedOperation {
    name: String,
    declarations: Vec<PermissionDeclaration>,
}

impl GuardedOperation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declarations: Vec::new(),
        }
    }

    pub fn declare(mut self, declaration: PermissionDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declarations(&self) -> &[PermissionDeclaration] {
        &self.declarations
    }

    /// An operation with no declarations is open to everyone
    pub fn is_guarded(&self) -> bool {
        !self.declarations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permit_types::Mode;

    #[test]
    fn parse_validates_every_part() {
        let decl = PermissionDeclaration::parse(["article_edit"], "any", Some("article")).unwrap();
        assert_eq!(decl.subject_param(), Some("article"));
        assert_eq!(decl.required().mode(), Mode::Any);

        assert_eq!(
            PermissionDeclaration::parse(["article_edit"], "any", Some("  ")),
            Err(ValidationError::EmptySubjectParameter)
        );
        assert_eq!(
            PermissionDeclaration::parse(Vec::<String>::new(), "any", None),
            Err(ValidationError::EmptyCodeList)
        );
        assert!(matches!(
            PermissionDeclaration::parse(["a"], "both", None),
            Err(ValidationError::InvalidMode(_))
        ));
    }

    #[test]
    fn stacked_declarations_keep_order() {
        let op = GuardedOperation::new("ArticleController::edit")
            .declare(PermissionDeclaration::require(
                RequiredPermissions::one("article_edit").unwrap(),
            ))
            .declare(PermissionDeclaration::require(
                RequiredPermissions::one("article_access").unwrap(),
            ));

        assert!(op.is_guarded());
        let first: Vec<_> = op
            .declarations()
            .iter()
            .map(|d| d.required().code_strs()[0])
            .collect();
        assert_eq!(first, vec!["article_edit", "article_access"]);
        assert!(!GuardedOperation::new("open").is_guarded());
    }
}
