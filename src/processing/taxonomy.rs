//! Static skill catalog with category membership and alias normalization

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use strsim::jaro_winkler;

/// Category every canonical skill belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Programming,
    Frontend,
    Backend,
    Database,
    Cloud,
    Tools,
    DataAi,
    Architecture,
    Methodology,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 9] = [
        SkillCategory::Programming,
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Database,
        SkillCategory::Cloud,
        SkillCategory::Tools,
        SkillCategory::DataAi,
        SkillCategory::Architecture,
        SkillCategory::Methodology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Programming => "programming",
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
            SkillCategory::Database => "database",
            SkillCategory::Cloud => "cloud",
            SkillCategory::Tools => "tools",
            SkillCategory::DataAi => "data_ai",
            SkillCategory::Architecture => "architecture",
            SkillCategory::Methodology => "methodology",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical skill entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: SkillCategory,
}

/// Alias entry resolving to a canonical name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillAlias {
    pub alias: String,
    pub canonical: String,
    pub confidence: f64,
}

/// Read-only skill catalog. Built once and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    skills: Vec<Skill>,
    index: HashMap<String, usize>,
    aliases: HashMap<String, SkillAlias>,
}

impl SkillTaxonomy {
    /// Build the taxonomy from the bundled catalog and alias table.
    pub fn new() -> Self {
        Self::from_parts(default_catalog(), default_aliases())
    }

    /// Build from explicit catalog and alias entries.
    ///
    /// Names are lowercased. A skill listed twice keeps its first category.
    /// Aliases are confidence-clamped to `(0, 1]`.
    pub fn from_parts(
        catalog: Vec<(SkillCategory, Vec<&str>)>,
        aliases: Vec<(&str, &str, f64)>,
    ) -> Self {
        let mut skills = Vec::new();
        let mut index = HashMap::new();

        for (category, names) in catalog {
            for name in names {
                let name = name.trim().to_lowercase();
                if name.is_empty() || index.contains_key(&name) {
                    continue;
                }
                index.insert(name.clone(), skills.len());
                skills.push(Skill { name, category });
            }
        }

        let aliases = aliases
            .into_iter()
            .map(|(alias, canonical, confidence)| {
                let alias = alias.trim().to_lowercase();
                let entry = SkillAlias {
                    alias: alias.clone(),
                    canonical: canonical.trim().to_lowercase(),
                    confidence: confidence.clamp(f64::MIN_POSITIVE, 1.0),
                };
                (alias, entry)
            })
            .collect();

        Self {
            skills,
            index,
            aliases,
        }
    }

    /// Resolve a token to its canonical name and confidence.
    ///
    /// Taxonomy members win over aliases; unknown tokens pass through lowercased.
    pub fn normalize(&self, token: &str) -> (String, f64) {
        let lowered = token.trim().to_lowercase();

        if self.index.contains_key(&lowered) {
            return (lowered, 1.0);
        }

        if let Some(alias) = self.aliases.get(&lowered) {
            return (alias.canonical.clone(), alias.confidence);
        }

        (lowered, 1.0)
    }

    /// Category of a known skill.
    pub fn category(&self, skill: &str) -> Option<SkillCategory> {
        self.index
            .get(&skill.trim().to_lowercase())
            .map(|&i| self.skills[i].category)
    }

    /// Category of a skill, defaulting to `Tools` for anything unclassified.
    pub fn category_of(&self, skill: &str) -> SkillCategory {
        self.category(skill).unwrap_or(SkillCategory::Tools)
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.index.contains_key(&skill.trim().to_lowercase())
    }

    /// Skills in catalog order.
    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter()
    }

    pub fn skills_in(&self, category: SkillCategory) -> impl Iterator<Item = &Skill> {
        self.skills.iter().filter(move |s| s.category == category)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Taxonomy skills whose spelling is close to `token`, best first.
    pub fn similar_skills(&self, token: &str, limit: usize) -> Vec<(String, f64)> {
        let lowered = token.trim().to_lowercase();
        if lowered.len() < 3 {
            return Vec::new();
        }

        let mut candidates: Vec<(String, f64)> = self
            .skills
            .iter()
            .filter(|s| s.name != lowered)
            .map(|s| (s.name.clone(), jaro_winkler(&lowered, &s.name)))
            .filter(|(_, score)| *score >= 0.8)
            .collect();

        candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        candidates.truncate(limit);
        candidates
    }
}

impl Default for SkillTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}

fn default_catalog() -> Vec<(SkillCategory, Vec<&'static str>)> {
    vec![
        (
            SkillCategory::Programming,
            vec![
                "python", "java", "javascript", "typescript", "go", "rust", "c++", "c#", "php",
                "ruby", "kotlin", "swift", "scala", "r", "matlab", "perl", "lua", "dart",
                "objective-c", "assembly", "cobol", "fortran", "haskell", "clojure", "erlang",
                "elixir",
            ],
        ),
        (
            SkillCategory::Frontend,
            vec![
                "react", "vue", "angular", "svelte", "html", "css", "sass", "less", "stylus",
                "jquery", "bootstrap", "tailwind", "material-ui", "ant-design", "webpack",
                "vite", "parcel", "rollup", "babel", "npm", "yarn", "pnpm",
            ],
        ),
        (
            SkillCategory::Backend,
            vec![
                "node.js", "express", "django", "flask", "fastapi", "spring", "spring-boot",
                "laravel", "symfony", "rails", "sinatra", "asp.net", ".net-core", "gin",
                "fiber", "echo", "koa", "nestjs", "next.js", "nuxt.js", "gatsby",
            ],
        ),
        (
            SkillCategory::Database,
            vec![
                "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "cassandra",
                "dynamodb", "sqlite", "oracle", "sql-server", "mariadb", "couchdb", "neo4j",
                "influxdb", "clickhouse", "snowflake", "bigquery",
            ],
        ),
        (
            SkillCategory::Cloud,
            vec![
                "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "ansible",
                "jenkins", "gitlab-ci", "github-actions", "circleci", "travis-ci", "helm",
                "istio", "prometheus", "grafana", "elk-stack", "datadog",
            ],
        ),
        (
            SkillCategory::Tools,
            vec![
                "git", "github", "gitlab", "bitbucket", "jira", "confluence", "slack", "teams",
                "notion", "linux", "bash", "powershell", "vim", "vscode", "intellij", "eclipse",
                "postman", "insomnia",
            ],
        ),
        (
            SkillCategory::DataAi,
            vec![
                "tensorflow", "pytorch", "scikit-learn", "pandas", "numpy", "matplotlib",
                "seaborn", "plotly", "jupyter", "apache-spark", "hadoop", "kafka", "airflow",
                "dbt", "looker", "tableau", "power-bi",
            ],
        ),
        (
            SkillCategory::Architecture,
            vec![
                "rest", "graphql", "grpc", "soap", "microservices", "serverless",
                "event-driven", "cqrs", "ddd", "api-gateway", "load-balancer", "oauth", "jwt",
                "ssl", "tls", "websockets", "sse",
            ],
        ),
        (
            SkillCategory::Methodology,
            vec![
                "agile", "scrum", "kanban", "lean", "devops", "ci/cd", "tdd", "bdd",
                "pair-programming", "code-review", "unit-testing", "integration-testing",
                "e2e-testing", "performance-testing", "security-testing",
            ],
        ),
    ]
}

// No alias target may itself be an alias key; normalization stays idempotent.
fn default_aliases() -> Vec<(&'static str, &'static str, f64)> {
    vec![
        ("js", "javascript", 1.0),
        ("ts", "typescript", 1.0),
        ("golang", "go", 1.0),
        ("py", "python", 0.9),
        ("nodejs", "node.js", 1.0),
        ("node", "node.js", 0.9),
        ("reactjs", "react", 1.0),
        ("react.js", "react", 1.0),
        ("vuejs", "vue", 1.0),
        ("vue.js", "vue", 1.0),
        ("angularjs", "angular", 0.9),
        ("nextjs", "next.js", 1.0),
        ("nuxtjs", "nuxt.js", 1.0),
        ("springboot", "spring-boot", 1.0),
        ("postgres", "postgresql", 1.0),
        ("mongo", "mongodb", 1.0),
        ("k8s", "kubernetes", 1.0),
        ("tf", "terraform", 0.8),
        ("sklearn", "scikit-learn", 1.0),
        ("spark", "apache-spark", 0.9),
        ("powerbi", "power-bi", 1.0),
        ("ml", "machine learning", 1.0),
        ("ai", "artificial intelligence", 1.0),
        ("dl", "deep learning", 1.0),
        ("sql", "database", 0.7),
        ("nosql", "mongodb", 0.6),
        ("rdbms", "postgresql", 0.7),
        ("ux", "user experience", 1.0),
        ("ui", "user interface", 1.0),
        ("mvc", "model-view-controller", 1.0),
        ("orm", "object-relational mapping", 1.0),
        ("api", "application programming interface", 1.0),
    ]
}
