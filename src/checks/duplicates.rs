use std::collections::HashSet;

use anyhow::Result;

use crate::automaton::Trie;
use crate::checks::Check;
use crate::loader::Dataset;
use crate::models::Finding;
use crate::tokenize::{TokenDictionary, Tokenizer};

/// Corpus-wide duplicate and containment detection.
///
/// Every rule body is reduced to a sequence of token ids and indexed in one
/// automaton, so a single pass over each body finds all other rules whose
/// entire sequence occurs inside it. Two rules with the same token sequence
/// are duplicates; a shorter rule occurring inside a longer one with the same
/// expression is worth a manual look.
pub struct DuplicatesCheck {
    tokenizer: Tokenizer,
}

impl DuplicatesCheck {
    pub fn new() -> Result<Self> {
        Ok(DuplicatesCheck {
            tokenizer: Tokenizer::new()?,
        })
    }
}

impl Check for DuplicatesCheck {
    fn run(&self, dataset: &Dataset) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        let mut dictionary = TokenDictionary::new();

        let sequences: Vec<Vec<u32>> = dataset
            .records
            .iter()
            .map(|record| {
                self.tokenizer
                    .tokens(&record.body)
                    .iter()
                    .map(|token| dictionary.intern(token))
                    .collect()
            })
            .collect();

        let mut trie: Trie<u32, usize> = Trie::new();
        for (index, seq) in sequences.iter().enumerate() {
            if seq.is_empty() {
                continue;
            }
            // later copies never enter the trie, every duplicate names the
            // first occurrence
            if let Some(&previous) = trie.get(seq) {
                findings.push(Finding::error(
                    &dataset.records[index].file_name,
                    "duplicate-rule",
                    format!(
                        "token sequence duplicates {}",
                        dataset.records[previous].file_name
                    ),
                ));
                continue;
            }
            trie.insert(seq, index);
        }
        if trie.is_empty() {
            return Ok(findings);
        }
        trie.build();

        let mut reported = HashSet::new();
        for (outer, seq) in sequences.iter().enumerate() {
            for (_, &inner) in trie.find_all(seq) {
                if inner == outer {
                    continue;
                }
                // Equal lengths means an identical sequence, already reported
                // as a duplicate above.
                if sequences[inner].len() == seq.len() {
                    continue;
                }
                let contained = &dataset.records[inner];
                let container = &dataset.records[outer];
                if contained.metadata.is_license_text || container.metadata.is_license_text {
                    continue;
                }
                if contained.metadata.license_expression != container.metadata.license_expression {
                    continue;
                }
                if reported.insert((inner, outer)) {
                    findings.push(Finding::warning(
                        &contained.file_name,
                        "contained-rule",
                        format!("entire rule appears inside {}", container.file_name),
                    ));
                }
            }
        }

        Ok(findings)
    }
}
