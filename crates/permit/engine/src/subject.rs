//! Subject resolution
//!
//! Guards name their subject by parameter; a resolver turns that name into
//! the actual object from the caller's request context.

use std::collections::HashMap;

use permit_types::Subject;

/// Locates a subject by parameter name.
pub trait SubjectResolver {
    fn resolve(&self, parameter: &str) -> Option<Subject>;
}

impl<F> SubjectResolver for F
where
    F: Fn(&str) -> Option<Subject>,
{
    fn resolve(&self, parameter: &str) -> Option<Subject> {
        self(parameter)
    }
}

/// Resolver for callers with no request context
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSubjects;

impl SubjectResolver for NoSubjects {
    fn resolve(&self, _parameter: &str) -> Option<Subject> {
        None
    }
}

/// Request attribute bag keyed by name.
///
/// Lookup is by exact name first. Failing that, a single subject whose type
/// name matches the parameter (full path, or short name ignoring case) is
/// returned.
#[derive(Debug, Default, Clone)]
pub struct SubjectBag {
    subjects: HashMap<String, Subject>,
}

impl SubjectBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, subject: Subject) -> Option<Subject> {
        self.subjects.insert(name.into(), subject)
    }

    pub fn with<T>(mut self, name: impl Into<String>, value: T) -> Self
    where
        T: std::any::Any + Send + Sync,
    {
        self.subjects.insert(name.into(), Subject::new(value));
        self
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    fn by_type(&self, parameter: &str) -> Option<Subject> {
        let mut matches = self.subjects.values().filter(|s| {
            s.type_name() == parameter || s.short_type_name().eq_ignore_ascii_case(parameter)
        });
        let first = matches.next()?;
        // ambiguous type matches resolve to nothing
        if matches.next().is_some() {
            return None;
        }
        Some(first.clone())
    }
}

impl SubjectResolver for SubjectBag {
    fn resolve(&self, parameter: &str) -> Option<Subject> {
        self.subjects
            .get(parameter)
            .cloned()
            .or_else(|| self.by_type(parameter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Article {
        id: u32,
    }

    #[derive(Debug)]
    struct Comment;

    #[test]
    fn resolves_by_name() {
        let bag = SubjectBag::new().with("post", Article { id: 4 });
        let subject = bag.resolve("post").unwrap();
        assert_eq!(subject.downcast_ref::<Article>().unwrap().id, 4);
        assert!(bag.resolve("missing").is_none());
    }

    #[test]
    fn falls_back_to_type_name() {
        let bag = SubjectBag::new()
            .with("post", Article { id: 4 })
            .with("reply", Comment);
        assert!(bag.resolve("article").unwrap().is::<Article>());
        assert!(bag.resolve("Comment").unwrap().is::<Comment>());
    }

    #[test]
    fn ambiguous_type_match_is_unresolved() {
        let bag = SubjectBag::new()
            .with("a", Article { id: 1 })
            .with("b", Article { id: 2 });
        assert!(bag.resolve("article").is_none());
    }

    #[test]
    fn no_subjects_resolves_nothing() {
        assert!(NoSubjects.resolve("article").is_none());
    }
}
