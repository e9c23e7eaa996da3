// src/graph/mutate.rs
//! In-place graph mutations.
//!
//! Every operation validates first and only then touches the graph, so a
//! failed call leaves it exactly as it was.

use super::query::all_descendants;
use super::types::{Family, Individual};
use super::Graph;
use crate::error::{GedcomError, Result};
use crate::gedcom::Xref;

impl Graph {
    /// Appends a new individual with no family links and returns its fresh id.
    ///
    /// Names are not checked for uniqueness.
    ///
    /// # Errors
    /// Returns `GedcomError::InvalidArgument` if either name contains a `/` or a
    /// control character, since neither survives a save and reload.
    pub fn add_individual(&mut self, given: &str, surname: &str) -> Result<Xref> {
        check_name_part("given name", given)?;
        check_name_part("surname", surname)?;

        let id = self.mint_individual_id();
        self.push_individual(Individual::new(id.clone(), given.trim(), surname.trim()));
        log::info!("added individual {id} ({given} /{surname}/)");
        Ok(id)
    }

    /// Creates a family for the given spouses and returns its fresh id.
    ///
    /// # Errors
    /// Returns `GedcomError::InvalidArgument` if a spouse id is unknown or both
    /// spouses are the same individual.
    pub fn add_family(&mut self, husband: Option<&Xref>, wife: Option<&Xref>) -> Result<Xref> {
        for spouse in husband.into_iter().chain(wife) {
            self.require_individual(spouse)?;
        }
        if husband.is_some() && husband == wife {
            return Err(GedcomError::InvalidArgument(format!(
                "{} cannot be both spouses of one family",
                husband.map_or_else(String::new, ToString::to_string)
            )));
        }

        let id = self.mint_family_id();
        let mut family = Family::new(id.clone());
        family.husband = husband.cloned();
        family.wife = wife.cloned();

        for spouse in husband.into_iter().chain(wife) {
            if let Some(person) = self.individual_mut(spouse) {
                person.spouse_of.push(id.clone());
            }
        }
        self.push_family(family);
        log::info!("added family {id}");
        Ok(id)
    }

    /// Links `child` into `family`.
    ///
    /// # Errors
    /// `InvalidArgument` if either id is unknown or the child already has parents,
    /// `Cycle` if the child would become their own ancestor.
    pub fn add_child(&mut self, family: &Xref, child: &Xref) -> Result<()> {
        let Some(fam) = self.family(family) else {
            return Err(GedcomError::InvalidArgument(format!("no family {family}")));
        };
        let person = self.require_individual(child)?;
        if let Some(existing) = &person.child_of {
            return Err(GedcomError::InvalidArgument(format!(
                "{child} is already a child of {existing}"
            )));
        }

        let descendants = all_descendants(self, child);
        let loops = fam
            .spouses()
            .any(|spouse| spouse == child || descendants.contains(spouse));
        if loops {
            return Err(GedcomError::Cycle {
                id: child.to_string(),
            });
        }

        if let Some(fam) = self.family_mut(family) {
            fam.children.push(child.clone());
        }
        if let Some(person) = self.individual_mut(child) {
            person.child_of = Some(family.clone());
        }
        log::info!("linked {child} as child of {family}");
        Ok(())
    }

    fn require_individual(&self, id: &Xref) -> Result<&Individual> {
        self.individual(id)
            .ok_or_else(|| GedcomError::InvalidArgument(format!("no individual {id}")))
    }
}

/// `/` delimits the surname in a `NAME` value and line breaks end the record.
fn check_name_part(what: &str, value: &str) -> Result<()> {
    match value.chars().find(|&c| c == '/' || c.is_control()) {
        Some(c) => Err(GedcomError::InvalidArgument(format!(
            "{what} {value:?} contains {c:?}"
        ))),
        None => Ok(()),
    }
}
