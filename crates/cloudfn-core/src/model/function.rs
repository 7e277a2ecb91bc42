use super::{DocumentPath, TriggerKind};
use serde::{Deserialize, Serialize};

/// Where a function's trigger kind came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationSource {
    /// Declared explicitly in functions.kdl
    Manifest,
    /// Inferred from the function signature and docstring
    Heuristic,
}

/// A locally declared function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub trigger: TriggerKind,
    /// Only set for Firestore triggers
    pub resource_path: Option<DocumentPath>,
    pub source: DeclarationSource,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, trigger: TriggerKind) -> Self {
        Self {
            name: name.into(),
            trigger,
            resource_path: None,
            source: DeclarationSource::Heuristic,
        }
    }

    pub fn with_resource_path(mut self, path: DocumentPath) -> Self {
        if self.trigger.is_firestore() {
            self.resource_path = Some(path);
        }
        self
    }

    pub fn with_source(mut self, source: DeclarationSource) -> Self {
        self.source = source;
        self
    }
}

/// Ordered set of local functions, unique by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionSet {
    functions: Vec<FunctionDescriptor>,
}

impl FunctionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a function, keeping the original position on replace
    pub fn upsert(&mut self, function: FunctionDescriptor) {
        if let Some(existing) = self.functions.iter_mut().find(|f| f.name == function.name) {
            *existing = function;
        } else {
            self.functions.push(function);
        }
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.functions.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn by_trigger(&self, trigger: TriggerKind) -> Vec<&FunctionDescriptor> {
        self.functions
            .iter()
            .filter(|f| f.trigger == trigger)
            .collect()
    }

    pub fn firestore(&self) -> Vec<&FunctionDescriptor> {
        self.functions
            .iter()
            .filter(|f| f.trigger.is_firestore())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FromIterator<FunctionDescriptor> for FunctionSet {
    fn from_iter<I: IntoIterator<Item = FunctionDescriptor>>(iter: I) -> Self {
        let mut set = FunctionSet::new();
        for function in iter {
            set.upsert(function);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_keeps_position() {
        let mut set: FunctionSet = [
            FunctionDescriptor::new("a", TriggerKind::Http),
            FunctionDescriptor::new("b", TriggerKind::Unknown),
        ]
        .into_iter()
        .collect();

        set.upsert(
            FunctionDescriptor::new("b", TriggerKind::Storage)
                .with_source(DeclarationSource::Manifest),
        );

        assert_eq!(set.names(), vec!["a", "b"]);
        assert_eq!(set.get("b").unwrap().trigger, TriggerKind::Storage);
        assert_eq!(set.get("b").unwrap().source, DeclarationSource::Manifest);
    }

    #[test]
    fn test_resource_path_only_for_firestore() {
        let path = DocumentPath::parse("users/{id}").unwrap();
        let http = FunctionDescriptor::new("h", TriggerKind::Http).with_resource_path(path.clone());
        assert!(http.resource_path.is_none());

        let create =
            FunctionDescriptor::new("c", TriggerKind::FirestoreCreate).with_resource_path(path);
        assert!(create.resource_path.is_some());
    }

    #[test]
    fn test_filters() {
        let set: FunctionSet = [
            FunctionDescriptor::new("a", TriggerKind::Http),
            FunctionDescriptor::new("b", TriggerKind::FirestoreCreate),
            FunctionDescriptor::new("c", TriggerKind::FirestoreWrite),
            FunctionDescriptor::new("d", TriggerKind::Http),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.by_trigger(TriggerKind::Http).len(), 2);
        assert_eq!(set.by_trigger(TriggerKind::Storage).len(), 0);
        let firestore: Vec<&str> = set.firestore().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(firestore, vec!["b", "c"]);
    }
}
