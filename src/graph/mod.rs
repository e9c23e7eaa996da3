// src/graph/mod.rs
//! In-memory family graph.
//!
//! Individuals and families live in declaration-ordered arenas and refer to
//! each other by [`Xref`], never by pointer.

pub mod builder;
pub mod cycles;
pub mod mutate;
pub mod query;
pub mod types;

pub use builder::build;
pub use types::{
    Encoding, Family, FileHeader, FileSummary, Generations, Individual, PersonName, Sex,
    Submitter,
};

use crate::gedcom::Xref;
use std::collections::HashMap;

/// Source written into headers of files this crate creates.
pub const DEFAULT_SOURCE: &str = "genealogy";
/// GEDCOM version written into headers of files this crate creates.
pub const DEFAULT_VERSION: &str = "5.5";

const INDIVIDUAL_PREFIX: char = 'I';
const FAMILY_PREFIX: char = 'F';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    header: FileHeader,
    individuals: Vec<Individual>,
    families: Vec<Family>,
    individual_index: HashMap<Xref, usize>,
    family_index: HashMap<Xref, usize>,
    next_individual: u64,
    next_family: u64,
}

impl Graph {
    /// An empty graph carrying `header`. Header counts are reset to zero.
    #[must_use]
    pub fn new(mut header: FileHeader) -> Self {
        header.individual_count = 0;
        header.family_count = 0;
        Self {
            header,
            individuals: Vec::new(),
            families: Vec::new(),
            individual_index: HashMap::new(),
            family_index: HashMap::new(),
            next_individual: 1,
            next_family: 1,
        }
    }

    /// The header-only graph used to seed a brand-new file.
    #[must_use]
    pub fn new_file(submitter: Submitter) -> Self {
        Self::new(FileHeader::new(
            DEFAULT_SOURCE,
            DEFAULT_VERSION,
            Encoding::Ansel,
            submitter,
        ))
    }

    /// Assembles a graph from parts whose links are already consistent.
    pub(crate) fn from_parts(
        header: FileHeader,
        individuals: Vec<Individual>,
        families: Vec<Family>,
    ) -> Self {
        let mut graph = Self::new(header);
        for individual in individuals {
            graph.push_individual(individual);
        }
        for family in families {
            graph.push_family(family);
        }
        graph
    }

    #[must_use]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    #[must_use]
    pub fn submitter(&self) -> &Submitter {
        &self.header.submitter
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn families(&self) -> &[Family] {
        &self.families
    }

    #[must_use]
    pub fn individual(&self, id: &Xref) -> Option<&Individual> {
        self.individual_index
            .get(id)
            .and_then(|&idx| self.individuals.get(idx))
    }

    #[must_use]
    pub fn family(&self, id: &Xref) -> Option<&Family> {
        self.family_index.get(id).and_then(|&idx| self.families.get(idx))
    }

    pub(crate) fn individual_mut(&mut self, id: &Xref) -> Option<&mut Individual> {
        let idx = *self.individual_index.get(id)?;
        self.individuals.get_mut(idx)
    }

    pub(crate) fn family_mut(&mut self, id: &Xref) -> Option<&mut Family> {
        let idx = *self.family_index.get(id)?;
        self.families.get_mut(idx)
    }

    /// Names of all individuals in declaration order.
    #[must_use]
    pub fn individual_listing(&self) -> Vec<PersonName> {
        self.individuals.iter().map(Individual::name).collect()
    }

    #[must_use]
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            source: self.header.source.clone(),
            version: self.header.version.clone(),
            encoding: self.header.encoding,
            submitter_name: self.header.submitter.name.clone(),
            submitter_address: self.header.submitter.address.clone(),
            individual_count: self.header.individual_count,
            family_count: self.header.family_count,
        }
    }

    pub(crate) fn push_individual(&mut self, individual: Individual) {
        if let Some(seq) = individual.id.sequence(INDIVIDUAL_PREFIX) {
            self.next_individual = self.next_individual.max(seq.saturating_add(1));
        }
        self.individual_index
            .insert(individual.id.clone(), self.individuals.len());
        self.individuals.push(individual);
        self.header.individual_count = self.individuals.len();
    }

    pub(crate) fn push_family(&mut self, family: Family) {
        if let Some(seq) = family.id.sequence(FAMILY_PREFIX) {
            self.next_family = self.next_family.max(seq.saturating_add(1));
        }
        self.family_index.insert(family.id.clone(), self.families.len());
        self.families.push(family);
        self.header.family_count = self.families.len();
    }

    /// Next unused `I<n>` identifier. The counter only moves forward.
    pub(crate) fn mint_individual_id(&mut self) -> Xref {
        loop {
            let id = Xref::new(format!("{INDIVIDUAL_PREFIX}{}", self.next_individual));
            self.next_individual += 1;
            if !self.individual_index.contains_key(&id) && !self.family_index.contains_key(&id) {
                return id;
            }
        }
    }

    /// Next unused `F<n>` identifier. The counter only moves forward.
    pub(crate) fn mint_family_id(&mut self) -> Xref {
        loop {
            let id = Xref::new(format!("{FAMILY_PREFIX}{}", self.next_family));
            self.next_family += 1;
            if !self.individual_index.contains_key(&id) && !self.family_index.contains_key(&id) {
                return id;
            }
        }
    }
}
