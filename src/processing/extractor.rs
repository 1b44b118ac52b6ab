//! Skill mention extraction with contextual confidence

use crate::error::Result;
use crate::processing::taxonomy::SkillTaxonomy;
use crate::processing::text_processor::{context_window, is_whole_word};
use aho_corasick::{AhoCorasick, MatchKind};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub const MAX_CONFIDENCE: f64 = 2.0;

/// One skill mention found in a source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub skill: String,
    pub context: String,
    pub confidence: f64,
}

/// A pass over free text that yields skill evidence.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, text: &str) -> Vec<ExtractedSkill>;
}

/// Runs every configured strategy over the same input and merges the evidence.
pub struct SkillExtractor {
    taxonomy: Arc<SkillTaxonomy>,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl SkillExtractor {
    /// Dictionary scan followed by structured-content scan.
    pub fn new(taxonomy: Arc<SkillTaxonomy>, context_width: usize) -> Result<Self> {
        let strategies: Vec<Box<dyn ExtractionStrategy>> = vec![
            Box::new(DictionaryScan::new(taxonomy.clone(), context_width)?),
            Box::new(StructuredScan::new(taxonomy.clone())?),
        ];
        Ok(Self::with_strategies(taxonomy, strategies))
    }

    pub fn with_strategies(
        taxonomy: Arc<SkillTaxonomy>,
        strategies: Vec<Box<dyn ExtractionStrategy>>,
    ) -> Self {
        Self {
            taxonomy,
            strategies,
        }
    }

    pub fn taxonomy(&self) -> &Arc<SkillTaxonomy> {
        &self.taxonomy
    }

    /// All evidence from all strategies, duplicates included.
    pub fn extract(&self, text: &str) -> Vec<ExtractedSkill> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut found = Vec::new();
        for strategy in &self.strategies {
            let mut hits = strategy.extract(text);
            debug!("{} found {} skill mentions", strategy.name(), hits.len());
            for hit in &mut hits {
                hit.confidence = hit.confidence.clamp(0.0, MAX_CONFIDENCE);
            }
            found.append(&mut hits);
        }
        found
    }

    /// Best mention per skill, in first-seen order.
    pub fn extract_best(&self, text: &str) -> Vec<ExtractedSkill> {
        let mut order: Vec<ExtractedSkill> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for hit in self.extract(text) {
            match index.get(&hit.skill) {
                Some(&i) => {
                    if hit.confidence > order[i].confidence {
                        order[i] = hit;
                    }
                }
                None => {
                    index.insert(hit.skill.clone(), order.len());
                    order.push(hit);
                }
            }
        }

        order
    }

    /// Flat, duplicate-free skill list.
    pub fn extract_unique(&self, text: &str) -> Vec<String> {
        self.extract_best(text).into_iter().map(|hit| hit.skill).collect()
    }
}

struct ExperiencePhrase {
    pattern: Regex,
    boost: f64,
}

fn experience_phrases() -> Result<Vec<ExperiencePhrase>> {
    let table = [
        (r"(?i)(\d+)\+?\s*years?\s+(?:of\s+)?experience\s+(?:with\s+|in\s+)?(\w+)", 2.0),
        (r"(?i)senior\s+(\w+)\s+(?:developer|engineer)", 1.5),
        (r"(?i)lead\s+(\w+)\s+(?:developer|engineer)", 1.8),
        (r"(?i)principal\s+(\w+)\s+(?:developer|engineer)", 2.0),
        (r"(?i)expert\s+(?:in\s+|with\s+)?(\w+)", 1.7),
        (r"(?i)proficient\s+(?:in\s+|with\s+)?(\w+)", 1.3),
        (r"(?i)advanced\s+(\w+)", 1.4),
        (r"(?i)intermediate\s+(\w+)", 1.1),
        (r"(?i)basic\s+(\w+)", 0.8),
    ];

    table
        .iter()
        .map(|(pattern, boost)| {
            Ok(ExperiencePhrase {
                pattern: Regex::new(pattern)?,
                boost: *boost,
            })
        })
        .collect()
}

/// Whole-word scan for every taxonomy skill, boosted by nearby experience phrases.
pub struct DictionaryScan {
    matcher: AhoCorasick,
    patterns: Vec<String>,
    phrases: Vec<ExperiencePhrase>,
    context_width: usize,
}

impl DictionaryScan {
    pub fn new(taxonomy: Arc<SkillTaxonomy>, context_width: usize) -> Result<Self> {
        let patterns: Vec<String> = taxonomy.skills().map(|s| s.name.clone()).collect();
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&patterns)?;

        Ok(Self {
            matcher,
            patterns,
            phrases: experience_phrases()?,
            context_width,
        })
    }

    fn confidence_for(&self, context: &str) -> f64 {
        self.phrases
            .iter()
            .find(|phrase| phrase.pattern.is_match(context))
            .map_or(1.0, |phrase| phrase.boost.min(MAX_CONFIDENCE))
    }
}

impl ExtractionStrategy for DictionaryScan {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    fn extract(&self, text: &str) -> Vec<ExtractedSkill> {
        self.matcher
            .find_overlapping_iter(text)
            .filter(|m| is_whole_word(text, m.start(), m.end()))
            .map(|m| {
                let context = context_window(text, m.start(), m.end(), self.context_width);
                let confidence = self.confidence_for(&context);
                ExtractedSkill {
                    skill: self.patterns[m.pattern().as_usize()].clone(),
                    context,
                    confidence,
                }
            })
            .collect()
    }
}

/// Section markers, bullet lines and "token N years" phrases, filtered to known skills.
pub struct StructuredScan {
    taxonomy: Arc<SkillTaxonomy>,
    patterns: Vec<(Regex, f64)>,
    splitter: Regex,
}

impl StructuredScan {
    pub fn new(taxonomy: Arc<SkillTaxonomy>) -> Result<Self> {
        let table = [
            (r"(?:skills?|technologies?|tools?)\s*:?\s*([^.!?\n]+)", 1.2),
            (
                r"(?:experience with|proficient in|skilled in|expert in|knowledge of)\s+([^,.;]+)",
                1.3,
            ),
            (r"•\s*([^•\n]+?)(?:\n|$)", 1.1),
            (r"-\s*([^-\n]+?)(?:\n|$)", 1.1),
            (r"(\w+(?:\.\w+)*)\s*\d+\+?\s*years?", 1.5),
        ];

        let patterns = table
            .iter()
            .map(|(pattern, base)| Ok((Regex::new(pattern)?, *base)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            taxonomy,
            patterns,
            splitter: Regex::new(r"[,;/&\s]+")?,
        })
    }
}

impl ExtractionStrategy for StructuredScan {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn extract(&self, text: &str) -> Vec<ExtractedSkill> {
        let lowered = text.to_lowercase();
        let mut found = Vec::new();

        for (pattern, base) in &self.patterns {
            for caps in pattern.captures_iter(&lowered) {
                let Some(group) = caps.get(1) else { continue };
                let phrase = group.as_str().trim_matches(|c| " .,;-".contains(c));

                for candidate in self.splitter.split(phrase) {
                    let candidate = candidate.trim_matches(|c| " .,;()[]{}".contains(c));
                    if candidate.is_empty() {
                        continue;
                    }

                    let (skill, norm_confidence) = self.taxonomy.normalize(candidate);
                    if self.taxonomy.contains(&skill) {
                        found.push(ExtractedSkill {
                            skill,
                            context: group.as_str().to_string(),
                            confidence: (base * norm_confidence).clamp(0.0, MAX_CONFIDENCE),
                        });
                    }
                }
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SkillExtractor {
        SkillExtractor::new(Arc::new(SkillTaxonomy::new()), 20).unwrap()
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let extractor = extractor();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("   \n\t").is_empty());
        assert!(extractor.extract_unique("").is_empty());
    }

    #[test]
    fn test_dictionary_scan_finds_whole_words() {
        let extractor = extractor();
        let skills = extractor.extract_unique("We use Python and Docker daily, not javascriptish stuff");

        assert!(skills.contains(&"python".to_string()));
        assert!(skills.contains(&"docker".to_string()));
        assert!(!skills.contains(&"java".to_string()));
    }

    #[test]
    fn test_experience_phrases_boost_confidence() {
        let extractor = extractor();
        let hits = extractor.extract("Senior python developer with a passion for testing");
        let python = hits
            .iter()
            .filter(|h| h.skill == "python")
            .map(|h| h.confidence)
            .fold(0.0, f64::max);

        assert!(python > 1.0);
        assert!(python <= MAX_CONFIDENCE);
    }

    #[test]
    fn test_structured_scan_resolves_aliases() {
        let extractor = extractor();
        let skills = extractor.extract_unique("Skills: JS, k8s, postgres");

        assert!(skills.contains(&"javascript".to_string()));
        assert!(skills.contains(&"kubernetes".to_string()));
        assert!(skills.contains(&"postgresql".to_string()));
    }

    #[test]
    fn test_unique_keeps_best_confidence() {
        let extractor = extractor();
        let text = "Expert in rust. Also rust again.\n- rust";
        let best = extractor.extract_best(text);
        let all = extractor.extract(text);

        let rust_best = best.iter().find(|h| h.skill == "rust").unwrap();
        let max = all
            .iter()
            .filter(|h| h.skill == "rust")
            .map(|h| h.confidence)
            .fold(0.0, f64::max);
        assert_eq!(rust_best.confidence, max);
        assert_eq!(best.iter().filter(|h| h.skill == "rust").count(), 1);
    }

    #[test]
    fn test_confidence_bounds() {
        let extractor = extractor();
        let text = "10+ years experience with python. Lead go engineer. Basic css.\n• aws, gcp\nrust 5 years";
        for hit in extractor.extract(text) {
            assert!((0.0..=MAX_CONFIDENCE).contains(&hit.confidence), "{hit:?}");
        }
    }

    struct Fixed;

    impl ExtractionStrategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn extract(&self, _text: &str) -> Vec<ExtractedSkill> {
            vec![ExtractedSkill {
                skill: "haskell".to_string(),
                context: String::new(),
                confidence: 5.0,
            }]
        }
    }

    #[test]
    fn test_custom_strategy_is_clamped() {
        let extractor =
            SkillExtractor::with_strategies(Arc::new(SkillTaxonomy::new()), vec![Box::new(Fixed)]);
        let hits = extractor.extract("anything");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].confidence, MAX_CONFIDENCE);
    }
}
