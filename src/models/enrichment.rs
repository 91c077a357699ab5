/// Outcome of a best-effort enrichment call. Both arms carry a usable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment<T> {
    Fresh(T),
    Fallback { value: T, reason: String },
}

impl<T> Enrichment<T> {
    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        Enrichment::Fallback {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Enrichment::Fresh(value) => value,
            Enrichment::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Enrichment::Fresh(value) => value,
            Enrichment::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Enrichment::Fallback { .. })
    }
}
