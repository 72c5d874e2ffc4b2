use serde::{Deserialize, Serialize};

use crate::naming::{sanitize, Organism};

/// Default token marking a line as a reciprocal (mutual best) hit.
pub const RECIPROCAL_MARKER: &str = "<<";

/// Default namespace under the organism page where loci pages live.
pub const LOCI_NAMESPACE: &str = "Loci";

/// Insertion-ordered set of gene names collected within one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneNames(Vec<String>);

impl GeneNames {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds `name` unless it is already present. Returns true if it was added.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.0.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn join(&self, sep: &str) -> String {
        self.0.join(sep)
    }
}

impl<S: AsRef<str>> FromIterator<S> for GeneNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut names = GeneNames::new();
        for name in iter {
            names.insert(name.as_ref());
        }
        names
    }
}

/// A record of the BLAST report confirmed as reciprocal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReciprocalRecord {
    pub organism_initials: String,
    pub gene_names: GeneNames,
    pub contig_id: String,
    /// Verbatim text of the record, including the blank lines that closed it.
    pub raw_text: String,
}

impl ReciprocalRecord {
    /// Page identifier, e.g. `Lrub_Six3-6_Optix`.
    pub fn identifier(&self) -> String {
        let joined = format!("{}_{}", self.organism_initials, self.gene_names.join("_"));
        sanitize(&joined)
    }

    /// Human readable page title: the identifier with underscores as spaces.
    pub fn title(&self) -> String {
        self.identifier().replace('_', " ")
    }

    /// Contig id safe to use as a page name.
    pub fn sanitized_contig(&self) -> String {
        sanitize(&self.contig_id)
    }

    /// Cross reference to the locus page, e.g. `[[Lineus ruber:Loci:contig-1]]`.
    pub fn locus_link(&self, organism: &Organism, namespace: &str) -> String {
        format!("[[{}]]", self.locus_reference(organism, namespace))
    }

    /// `organism:namespace:contig_id` without the link brackets.
    pub fn locus_reference(&self, organism: &Organism, namespace: &str) -> String {
        format!("{}:{}:{}", organism.name, namespace, self.sanitized_contig())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(names: &[&str], contig: &str) -> ReciprocalRecord {
        ReciprocalRecord {
            organism_initials: "Lrub".to_string(),
            gene_names: names.iter().collect(),
            contig_id: contig.to_string(),
            raw_text: String::new(),
        }
    }

    #[test]
    fn test_gene_names_keep_first_appearance_order() {
        let mut names = GeneNames::new();
        assert!(names.insert("Six3"));
        assert!(names.insert("Optix"));
        assert!(!names.insert("Six3"));
        assert_eq!(names.as_slice(), &["Six3".to_string(), "Optix".to_string()]);
    }

    #[test]
    fn test_identifier_sanitizes_slashes() {
        let rec = record(&["Six3/6", "Optix"], "contig/1");
        assert_eq!(rec.identifier(), "Lrub_Six3-6_Optix");
        assert_eq!(rec.title(), "Lrub Six3-6 Optix");
        assert_eq!(rec.sanitized_contig(), "contig-1");
    }

    #[test]
    fn test_locus_link() {
        let organism = Organism::new("Lineus ruber").unwrap();
        let rec = record(&["Pax6"], "Lrub_5432/1");
        assert_eq!(rec.locus_link(&organism, LOCI_NAMESPACE), "[[Lineus ruber:Loci:Lrub_5432-1]]");
        assert_eq!(rec.locus_reference(&organism, "Contigs"), "Lineus ruber:Contigs:Lrub_5432-1");
    }
}
