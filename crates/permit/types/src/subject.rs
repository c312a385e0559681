use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The object an action targets, for row-level checks.
///
/// Opaque to the decision engine. Contextual checkers recover the concrete
/// value with [`Subject::downcast_ref`].
#[derive(Clone)]
pub struct Subject {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl Subject {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            value,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Fully qualified type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Last path segment of the type name, e.g. `Article`
    pub fn short_type_name(&self) -> &'static str {
        let base = self.type_name.split('<').next().unwrap_or(self.type_name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Article {
        id: u64,
    }

    #[test]
    fn downcasts_to_original_type() {
        let subject = Subject::new(Article { id: 7 });
        assert!(subject.is::<Article>());
        assert_eq!(subject.downcast_ref::<Article>(), Some(&Article { id: 7 }));
        assert!(subject.downcast_ref::<String>().is_none());
    }

    #[test]
    fn short_type_name_strips_path() {
        let subject = Subject::new(Article { id: 1 });
        assert_eq!(subject.short_type_name(), "Article");
        assert!(subject.type_name().ends_with("Article"));
    }
}
