//! Groups records into anchor-centred clusters.
//!
//! The first unclaimed record becomes the anchor and claims every later
//! record that matches it directly. Members are never compared with each
//! other, so if A matches B and B matches C but A does not match C, then
//! C is left for a later anchor.

use super::traits::ClusterPredicate;
use crate::core::fingerprint::Fingerprinted;
use std::collections::VecDeque;

/// An anchor and the records it claimed, with their distances
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<R> {
    pub anchor: R,
    pub members: Vec<(R, u32)>,
}

/// Result of one grouping stage
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping<R> {
    /// Clusters in anchor order
    pub clusters: Vec<Cluster<R>>,
    /// Records no anchor claimed, in their original order
    pub unclaimed: Vec<R>,
}

/// Non-transitive anchor grouping
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorGrouper;

impl AnchorGrouper {
    pub fn new() -> Self {
        Self
    }

    /// Run one stage over `records`, which must be in discovery order
    pub fn group<R, P>(&self, records: Vec<R>, predicate: &P) -> Grouping<R>
    where
        R: Fingerprinted,
        P: ClusterPredicate<R> + ?Sized,
    {
        let mut remaining: VecDeque<R> = records.into();
        let mut clusters = Vec::new();
        let mut unclaimed = Vec::new();

        while let Some(anchor) = remaining.pop_front() {
            let mut members = Vec::new();
            let mut rest = VecDeque::with_capacity(remaining.len());

            for candidate in remaining.drain(..) {
                let matched = if candidate.path() == anchor.path() {
                    None
                } else {
                    predicate.compare(&anchor, &candidate)
                };

                match matched {
                    Some(distance) => members.push((candidate, distance)),
                    None => rest.push_back(candidate),
                }
            }
            remaining = rest;

            if members.is_empty() {
                unclaimed.push(anchor);
            } else {
                clusters.push(Cluster { anchor, members });
            }
        }

        Grouping {
            clusters,
            unclaimed,
        }
    }
}
