//! Pairwise duplicate search over hash lists.

use super::{collapse_folder_groups, DuplicateGroup, ExactMatchRule, MatchOptions, MatchRule};
use crate::core::fingerprint::Fingerprint;
use crate::core::hashlist::{HashEntry, HashList};
use crate::core::pipeline::CancellationToken;
use crate::events::{CompareEvent, Event, EventSender, ProgressEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Groups found by a search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Groups in first-seen order
    pub groups: Vec<DuplicateGroup>,
    /// The search stopped early; `groups` is valid but possibly incomplete
    pub cancelled: bool,
}

/// Groups under construction, indexed by fingerprint
#[derive(Default)]
struct GroupIndex {
    groups: Vec<DuplicateGroup>,
    by_fingerprint: HashMap<Fingerprint, usize>,
}

impl GroupIndex {
    /// Record a match of `b` against `a`.
    ///
    /// The first match of a fingerprint creates its group seeded with `a`;
    /// every match then appends `b`. Returns `true` if the group was
    /// created by this call.
    fn record(&mut self, a: &HashEntry, b: &HashEntry) -> bool {
        let (index, created) = match self.by_fingerprint.get(a.fingerprint()) {
            Some(&index) => (index, false),
            None => {
                self.groups
                    .push(DuplicateGroup::new(a.fingerprint().clone(), a.file()));
                let index = self.groups.len() - 1;
                self.by_fingerprint.insert(a.fingerprint().clone(), index);
                (index, true)
            }
        };

        self.groups[index].add_file(b.file());
        created
    }
}

/// Finds duplicates according to [`MatchOptions`]
pub struct DuplicateMatcher {
    options: MatchOptions,
    rule: Box<dyn MatchRule>,
}

impl DuplicateMatcher {
    /// Create a matcher using the exact fingerprint rule
    pub fn new(options: MatchOptions) -> Self {
        let rule = Box::new(ExactMatchRule::new(options.compare_filenames));
        Self { options, rule }
    }

    /// Search the lists for duplicates.
    ///
    /// Entry `i` of a list is compared with the later entries of the same
    /// list, then with every entry of every later list, as far as the
    /// search mode allows. The token is polled before every comparison.
    pub fn find_duplicates(
        &self,
        lists: &[HashList],
        cancel: &CancellationToken,
        events: &EventSender,
    ) -> MatchOutcome {
        let mode = self.options.search_mode;
        let mut index = GroupIndex::default();
        let mut matched: Vec<Vec<bool>> = lists.iter().map(|l| vec![false; l.len()]).collect();

        events.send(Event::Compare(CompareEvent::Started {
            lists: lists.len(),
            total_entries: lists.iter().map(HashList::len).sum(),
        }));
        events.progress(ProgressEvent::PhaseChanged {
            text: "Searching for duplicates...".to_string(),
        });
        events.progress(ProgressEvent::Indeterminate { enabled: false });

        for (cl, list) in lists.iter().enumerate() {
            let current = list.entries();
            events.progress(ProgressEvent::Bounds {
                min: 0,
                max: current.len().saturating_sub(1),
                value: 0,
            });

            for (i, entry) in current.iter().enumerate() {
                if cancel.is_cancelled() {
                    return self.cancelled(index, events);
                }

                if mode.within_list() {
                    for (j, other) in current.iter().enumerate().skip(i + 1) {
                        if cancel.is_cancelled() {
                            return self.cancelled(index, events);
                        }
                        if self.compare(entry, other, &mut index, events) {
                            matched[cl][i] = true;
                            matched[cl][j] = true;
                        }
                    }
                }

                if mode.cross_list() {
                    for (ol, other_list) in lists.iter().enumerate().skip(cl + 1) {
                        for (x, other) in other_list.entries().iter().enumerate() {
                            if cancel.is_cancelled() {
                                return self.cancelled(index, events);
                            }
                            if self.compare(entry, other, &mut index, events) {
                                debug!("Duplicate found: {}, {}", entry.file(), other.file());
                                matched[cl][i] = true;
                                matched[ol][x] = true;
                            }
                        }
                    }
                }

                // Later entries can no longer change entry i's status.
                if self.options.reverse && !(self.options.no_duplicates && matched[cl][i]) {
                    index
                        .groups
                        .push(DuplicateGroup::new(entry.fingerprint().clone(), entry.file()));
                }

                events.progress(ProgressEvent::Value { value: i });
            }
        }

        let groups = if self.options.folders_only {
            collapse_folder_groups(index.groups)
        } else {
            index.groups
        };

        events.send(Event::Compare(CompareEvent::Completed {
            total_groups: groups.len(),
            cancelled: false,
        }));
        events.progress(ProgressEvent::Completed);

        MatchOutcome {
            groups,
            cancelled: false,
        }
    }

    /// Compare one pair, recording it unless in reverse mode
    fn compare(
        &self,
        a: &HashEntry,
        b: &HashEntry,
        index: &mut GroupIndex,
        events: &EventSender,
    ) -> bool {
        if !self.options.search_mode.allows_pair(a, b) || !self.rule.is_match(a, b) {
            return false;
        }

        if !self.options.reverse && index.record(a, b) {
            events.send(Event::Compare(CompareEvent::DuplicateFound {
                fingerprint: a.fingerprint().to_string(),
            }));
        }
        true
    }

    fn cancelled(&self, index: GroupIndex, events: &EventSender) -> MatchOutcome {
        info!("Duplicate search cancelled with {} groups", index.groups.len());
        events.send(Event::Compare(CompareEvent::Completed {
            total_groups: index.groups.len(),
            cancelled: true,
        }));

        MatchOutcome {
            groups: index.groups,
            cancelled: true,
        }
    }
}
