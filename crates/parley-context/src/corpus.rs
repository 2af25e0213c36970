//! Named definitions a selector ranks, such as `CREATE TABLE` statements.

/// Ordered collection of `(name, definition)` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    entries: Vec<(String, String)>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing the definition of an existing name in place
    pub fn insert(&mut self, name: impl Into<String>, definition: impl Into<String>) {
        let name = name.into();
        let definition = definition.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = definition,
            None => self.entries.push((name, definition)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Definitions of `names`, in the given order, separated by blank lines.
    ///
    /// Unknown names are ignored.
    pub fn definitions_for<S: AsRef<str>>(&self, names: &[S]) -> String {
        names
            .iter()
            .filter_map(|name| self.get(name.as_ref()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl<N, D> FromIterator<(N, D)> for Corpus
where
    N: Into<String>,
    D: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, D)>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        for (name, definition) in iter {
            corpus.insert(name, definition);
        }
        corpus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut corpus = Corpus::new();
        corpus.insert("users", "CREATE TABLE users (id INTEGER);");
        corpus.insert("jobs", "CREATE TABLE jobs (id INTEGER);");
        corpus.insert("users", "CREATE TABLE users (id INTEGER, name TEXT);");

        assert_eq!(corpus.names().collect::<Vec<_>>(), vec!["users", "jobs"]);
        assert_eq!(
            corpus.get("users"),
            Some("CREATE TABLE users (id INTEGER, name TEXT);")
        );
    }

    #[test]
    fn definitions_follow_requested_order() {
        let corpus: Corpus = [("users", "U;"), ("jobs", "J;")].into_iter().collect();
        assert_eq!(corpus.definitions_for(&["jobs", "missing", "users"]), "J;\n\nU;");
        assert_eq!(corpus.definitions_for::<&str>(&[]), "");
    }
}
