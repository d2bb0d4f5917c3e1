use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    antenna::Antenna,
    query::{AntennaQuery, QueryResult},
};

/// Owns the antenna collection, keyed by unique name, iterated in insertion
/// order. Mutation takes `&mut self` and queries take `&self`, so the borrow
/// checker rules out add/remove racing an in-flight query.
#[derive(Debug, Default)]
pub struct AntennaManager {
    antennas: Vec<Antenna>,
}

impl AntennaManager {
    pub fn new() -> AntennaManager {
        AntennaManager::default()
    }

    /// Insert an antenna. Refused (collection unchanged) when the name is
    /// already taken.
    pub fn add(&mut self, antenna: Antenna) -> bool {
        if self.get(&antenna.name).is_some() {
            warn!(name = %antenna.name, "duplicate antenna name, add refused");
            return false;
        }
        debug!(name = %antenna.name, "antenna added");
        self.antennas.push(antenna);
        true
    }

    /// Remove by name; returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.antennas.iter().position(|a| a.name == name) {
            Some(index) => {
                self.antennas.remove(index);
                debug!(name, "antenna removed");
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Antenna> {
        self.antennas.iter().find(|a| a.name == name)
    }

    pub fn len(&self) -> usize {
        self.antennas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.antennas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Antenna> {
        self.antennas.iter()
    }

    /// Distinct union of tags across the collection, recomputed on demand.
    pub fn tags(&self) -> BTreeSet<String> {
        self.antennas
            .iter()
            .flat_map(|a| a.tags.iter().cloned())
            .collect()
    }

    /// Evaluate the query against every owned antenna and rank the matches.
    ///
    /// Matching is pure per antenna, so evaluation fans out across the rayon
    /// pool; the collect preserves collection order, and the stable sort
    /// puts margin-clean matches first with insertion order as the
    /// secondary key. The head of that ordering is the best match.
    pub fn execute_query<'a>(&'a self, query: &AntennaQuery) -> QueryResult<'a> {
        let mut matches: Vec<_> = self
            .antennas
            .par_iter()
            .map(|antenna| antenna.match_query(query))
            .filter(|result| result.is_match)
            .collect();
        matches.sort_by_key(|result| !result.is_margin_match);

        debug!(
            candidates = self.antennas.len(),
            matches = matches.len(),
            bands = query.bands.len(),
            "query executed"
        );

        let mut rest = matches.into_iter();
        QueryResult {
            best_match: rest.next(),
            other_matches: rest.collect(),
        }
    }
}
