//! Three-tier job requirement classification

use crate::error::Result;
use crate::processing::extractor::SkillExtractor;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Requirement tiers in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementTier {
    MustHave,
    NiceToHave,
    Bonus,
}

impl RequirementTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementTier::MustHave => "must_have",
            RequirementTier::NiceToHave => "nice_to_have",
            RequirementTier::Bonus => "bonus",
        }
    }
}

impl std::fmt::Display for RequirementTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disjoint skill sets, ordered by first discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSet {
    pub must_have: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub bonus: Vec<String>,
}

impl RequirementSet {
    pub fn is_empty(&self) -> bool {
        self.must_have.is_empty() && self.nice_to_have.is_empty() && self.bonus.is_empty()
    }

    pub fn tier(&self, tier: RequirementTier) -> &[String] {
        match tier {
            RequirementTier::MustHave => &self.must_have,
            RequirementTier::NiceToHave => &self.nice_to_have,
            RequirementTier::Bonus => &self.bonus,
        }
    }

    fn tier_mut(&mut self, tier: RequirementTier) -> &mut Vec<String> {
        match tier {
            RequirementTier::MustHave => &mut self.must_have,
            RequirementTier::NiceToHave => &mut self.nice_to_have,
            RequirementTier::Bonus => &mut self.bonus,
        }
    }

    fn add_all(&mut self, tier: RequirementTier, skills: Vec<String>) {
        let set = self.tier_mut(tier);
        for skill in skills {
            if !set.contains(&skill) {
                set.push(skill);
            }
        }
    }

    /// Enforce must_have > nice_to_have > bonus.
    pub fn resolve_overlaps(&mut self) {
        let must = self.must_have.clone();
        self.nice_to_have.retain(|s| !must.contains(s));
        let nice = self.nice_to_have.clone();
        self.bonus.retain(|s| !must.contains(s) && !nice.contains(s));
    }

    /// Every skill across all tiers, in tier order.
    pub fn all_skills(&self) -> Vec<String> {
        self.must_have
            .iter()
            .chain(&self.nice_to_have)
            .chain(&self.bonus)
            .cloned()
            .collect()
    }

    /// Two-tier view: must-have, and nice-to-have merged with bonus.
    pub fn legacy_split(&self) -> (Vec<String>, Vec<String>) {
        let mut optional = self.nice_to_have.clone();
        optional.extend(self.bonus.iter().cloned());
        (self.must_have.clone(), optional)
    }
}

struct Section {
    tier: RequirementTier,
    label: Regex,
    terminators: Vec<Regex>,
}

pub struct RequirementClassifier {
    extractor: Arc<SkillExtractor>,
    sections: Vec<Section>,
    bullet: Regex,
    fallback: Vec<(RequirementTier, Vec<Regex>)>,
}

impl RequirementClassifier {
    pub fn new(extractor: Arc<SkillExtractor>) -> Result<Self> {
        let must_label = r"(?i)(?:required(?:\s+skills?)?|must[\s-]have|essential(?:\s+skills?)?)\s*:";
        let nice_label = r"(?i)(?:preferred(?:\s+skills?)?|nice[\s-]to[\s-]have)\s*:";
        let bonus_label = r"(?i)bonus(?:\s+points?)?\s*:";
        let blank_line = r"\n[ \t\r]*\n";

        let sections = vec![
            Section {
                tier: RequirementTier::MustHave,
                label: Regex::new(must_label)?,
                terminators: vec![
                    Regex::new(blank_line)?,
                    Regex::new(nice_label)?,
                    Regex::new(bonus_label)?,
                ],
            },
            Section {
                tier: RequirementTier::NiceToHave,
                label: Regex::new(nice_label)?,
                terminators: vec![Regex::new(blank_line)?, Regex::new(bonus_label)?],
            },
            Section {
                tier: RequirementTier::Bonus,
                label: Regex::new(bonus_label)?,
                terminators: vec![Regex::new(blank_line)?],
            },
        ];

        let must_patterns = [
            r"(?:required|must have|essential|mandatory|minimum|need|needs)\s*:?\s*([^.!?\n]+)",
            r"(?:you must|candidates must|required to|shall)\s+(?:have\s+)?([^.!?\n]+)",
            r"(?:minimum|at least)\s+(\d+\+?\s*years?\s+[^.!?\n]+)",
            r"(?:bachelor|master|degree|diploma|certification)\s+(?:in\s+)?([^.!?\n]+)",
            r"(?:experience|background)\s+(?:in\s+|with\s+)?([^.!?\n]+?)(?:required|mandatory|essential)",
            r"(?:strong|solid|extensive)\s+(?:experience|knowledge|skills?)\s+(?:in\s+|with\s+)?([^.!?\n]+)",
        ];
        let nice_patterns = [
            r"(?:preferred|nice to have|bonus|plus|advantage|desirable|would be nice|beneficial)\s*:?\s*([^.!?\n]+)",
            r"(?:good to have|asset|helpful|valuable)\s+(?:if\s+)?([^.!?\n]+)",
            r"(?:familiarity with|exposure to|some experience)\s+([^.!?\n]+)",
            r"(?:additional|extra|supplementary)\s+(?:skills?|experience)\s*:?\s*([^.!?\n]+)",
        ];
        let bonus_patterns = [
            r"(?:bonus points?|highly desired|strongly preferred|ideal candidate)\s+([^.!?\n]+)",
            r"(?:exceptional|outstanding|excellent)\s+(?:skills?|experience)\s+(?:in\s+|with\s+)?([^.!?\n]+)",
            r"(?:thought leader|expert|guru|ninja|rockstar)\s+(?:in\s+|with\s+)?([^.!?\n]+)",
        ];

        let compile = |patterns: &[&str]| -> Result<Vec<Regex>> {
            patterns.iter().map(|p| Ok(Regex::new(p)?)).collect()
        };

        let fallback = vec![
            (RequirementTier::MustHave, compile(&must_patterns)?),
            (RequirementTier::NiceToHave, compile(&nice_patterns)?),
            (RequirementTier::Bonus, compile(&bonus_patterns)?),
        ];

        Ok(Self {
            extractor,
            sections,
            bullet: Regex::new(r"(?m)^\s*[-•*]\s*(.+)$")?,
            fallback,
        })
    }

    /// Split a job description into must-have, nice-to-have and bonus skills.
    pub fn classify(&self, job_text: &str) -> RequirementSet {
        let mut set = RequirementSet::default();
        if job_text.trim().is_empty() {
            return set;
        }

        for section in &self.sections {
            if let Some(region) = self.section_region(section, job_text) {
                for item in self.section_items(region) {
                    set.add_all(section.tier, self.extractor.extract_unique(item));
                }
            }
        }

        if set.is_empty() {
            debug!("No labeled requirement sections found, using pattern fallback");
            let lowered = job_text.to_lowercase();
            for (tier, patterns) in &self.fallback {
                for pattern in patterns {
                    for caps in pattern.captures_iter(&lowered) {
                        if let Some(group) = caps.get(1) {
                            set.add_all(*tier, self.extractor.extract_unique(group.as_str()));
                        }
                    }
                }
            }
        }

        set.resolve_overlaps();
        debug!(
            "Classified requirements: {} must-have, {} nice-to-have, {} bonus",
            set.must_have.len(),
            set.nice_to_have.len(),
            set.bonus.len()
        );
        set
    }

    fn section_region<'t>(&self, section: &Section, text: &'t str) -> Option<&'t str> {
        let label = section.label.find(text)?;
        let rest = &text[label.end()..];
        let end = section
            .terminators
            .iter()
            .filter_map(|t| t.find(rest).map(|m| m.start()))
            .min()
            .unwrap_or(rest.len());
        Some(&rest[..end])
    }

    fn section_items<'t>(&self, region: &'t str) -> Vec<&'t str> {
        let bullets: Vec<&str> = self
            .bullet
            .captures_iter(region)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect();

        if !bullets.is_empty() {
            return bullets;
        }

        region
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::taxonomy::SkillTaxonomy;

    fn classifier() -> RequirementClassifier {
        let extractor = SkillExtractor::new(Arc::new(SkillTaxonomy::new()), 20).unwrap();
        RequirementClassifier::new(Arc::new(extractor)).unwrap()
    }

    #[test]
    fn test_empty_description() {
        let set = classifier().classify("   ");
        assert!(set.is_empty());
    }

    #[test]
    fn test_must_have_takes_precedence() {
        let text = "Required: Python, Django\nNice to have: Python, Redis";
        let set = classifier().classify(text);

        assert!(set.must_have.contains(&"python".to_string()));
        assert!(set.must_have.contains(&"django".to_string()));
        assert!(!set.nice_to_have.contains(&"python".to_string()));
        assert!(set.nice_to_have.contains(&"redis".to_string()));
    }

    #[test]
    fn test_bullet_sections_stop_at_blank_line() {
        let text = "Required skills:\n- Rust\n- PostgreSQL\n\nAbout us: we love Kafka\n\nBonus points:\n- Kubernetes";
        let set = classifier().classify(text);

        assert_eq!(set.must_have, vec!["rust".to_string(), "postgresql".to_string()]);
        assert!(set.nice_to_have.is_empty());
        assert_eq!(set.bonus, vec!["kubernetes".to_string()]);
        assert!(!set.all_skills().contains(&"kafka".to_string()));
    }

    #[test]
    fn test_pattern_fallback_when_no_sections() {
        let text = "You must have experience building services in Go and Docker. Familiarity with Terraform is a plus.";
        let set = classifier().classify(text);

        assert!(set.must_have.contains(&"go".to_string()));
        assert!(set.must_have.contains(&"docker".to_string()));
        assert!(set.nice_to_have.contains(&"terraform".to_string()));
    }

    #[test]
    fn test_tiers_are_disjoint() {
        let text = "Essential: AWS, Python\nPreferred: AWS, React\nBonus: React, Python, GraphQL";
        let set = classifier().classify(text);

        for skill in &set.must_have {
            assert!(!set.nice_to_have.contains(skill));
            assert!(!set.bonus.contains(skill));
        }
        for skill in &set.nice_to_have {
            assert!(!set.bonus.contains(skill));
        }
        assert_eq!(set.bonus, vec!["graphql".to_string()]);
    }

    #[test]
    fn test_legacy_split_merges_optional_tiers() {
        let set = RequirementSet {
            must_have: vec!["python".to_string()],
            nice_to_have: vec!["redis".to_string()],
            bonus: vec!["kafka".to_string()],
        };
        let (must, optional) = set.legacy_split();
        assert_eq!(must, vec!["python".to_string()]);
        assert_eq!(optional, vec!["redis".to_string(), "kafka".to_string()]);
    }
}
