//! Similarity-based dependency suggestions.
//!
//! Tasks are only compared within their project (tasks without a project
//! share one bucket). A pair becomes a candidate when their title and
//! description keywords overlap; the confidence score then weighs title
//! words (up to 40), tags (up to 30) and description keywords (up to 30).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::SuggestionConfig;
use crate::dependency::Dependency;
use crate::task::Task;

const TITLE_WEIGHT: f64 = 40.0;
const TAG_WEIGHT: f64 = 30.0;
const DESCRIPTION_POINTS_PER_KEYWORD: usize = 2;
const DESCRIPTION_MAX_POINTS: usize = 30;
const MAX_CONFIDENCE: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DependencySuggestion {
    /// Task that would gain the dependency.
    pub task_id: String,
    /// Task it would depend on.
    pub suggested_dependency_id: String,
    pub reason: String,
    /// 0-100.
    pub confidence: u8,
}

/// Suggestions with the default keyword rules.
pub fn generate_dependency_suggestions(
    tasks: &[Task],
    existing: &[Dependency],
) -> Vec<DependencySuggestion> {
    generate_dependency_suggestions_with(&SuggestionConfig::default(), tasks, existing)
}

/// Ranked suggestions, highest confidence first; equal scores keep the order
/// in which pairs were encountered (project buckets in first-seen order, then
/// task order within the bucket).
pub fn generate_dependency_suggestions_with(
    config: &SuggestionConfig,
    tasks: &[Task],
    existing: &[Dependency],
) -> Vec<DependencySuggestion> {
    let rules = KeywordRules::new(config);
    let linked: HashSet<(&str, &str)> = existing
        .iter()
        .map(|edge| (edge.task_id.as_str(), edge.depends_on_task_id.as_str()))
        .collect();

    let mut suggestions = Vec::new();
    for bucket in project_buckets(tasks) {
        let profiles: Vec<Profile<'_>> = bucket
            .into_iter()
            .filter(|task| !task.completed)
            .map(|task| Profile::new(task, &rules))
            .collect();

        for (i, subject) in profiles.iter().enumerate() {
            for (j, candidate) in profiles.iter().enumerate() {
                if i == j || subject.keywords.is_disjoint(&candidate.keywords) {
                    continue;
                }
                if linked.contains(&(subject.task.id.as_str(), candidate.task.id.as_str())) {
                    continue;
                }
                let confidence = confidence(subject, candidate);
                if confidence < config.min_confidence {
                    continue;
                }
                suggestions.push(DependencySuggestion {
                    task_id: subject.task.id.clone(),
                    suggested_dependency_id: candidate.task.id.clone(),
                    reason: format!("Similar context: \"{}\"", candidate.task.title),
                    confidence,
                });
            }
        }
    }

    // Stable: ties keep encounter order.
    suggestions.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    if let Some(limit) = config.limit {
        suggestions.truncate(limit);
    }
    tracing::debug!(
        tasks = tasks.len(),
        suggestions = suggestions.len(),
        "generated dependency suggestions"
    );
    suggestions
}

/// Tasks grouped by project id, buckets in order of first appearance.
fn project_buckets(tasks: &[Task]) -> Vec<Vec<&Task>> {
    let mut slot_by_project: HashMap<Option<&str>, usize> = HashMap::new();
    let mut buckets: Vec<Vec<&Task>> = Vec::new();
    for task in tasks {
        let key = task.project_id.as_deref();
        let slot = *slot_by_project.entry(key).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push(task);
    }
    buckets
}

struct KeywordRules {
    min_len: usize,
    stop_words: HashSet<String>,
}

impl KeywordRules {
    fn new(config: &SuggestionConfig) -> Self {
        Self {
            min_len: config.min_keyword_len,
            stop_words: config
                .stop_words
                .iter()
                .map(|word| word.trim().to_lowercase())
                .collect(),
        }
    }

    fn keywords<'t>(&self, texts: impl IntoIterator<Item = &'t str>) -> HashSet<String> {
        texts
            .into_iter()
            .flat_map(words)
            .filter(|word| word.chars().count() >= self.min_len)
            .filter(|word| !self.stop_words.contains(word))
            .collect()
    }
}

/// Lowercased alphanumeric runs.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

struct Profile<'a> {
    task: &'a Task,
    title_words: HashSet<String>,
    keywords: HashSet<String>,
    description_keywords: Option<HashSet<String>>,
    tags: HashSet<&'a str>,
}

impl<'a> Profile<'a> {
    fn new(task: &'a Task, rules: &KeywordRules) -> Self {
        let description = task.description_text();
        Self {
            task,
            title_words: words(&task.title).collect(),
            keywords: rules.keywords(std::iter::once(task.title.as_str()).chain(description)),
            description_keywords: description.map(|text| rules.keywords([text])),
            tags: task.tags.iter().map(String::as_str).collect(),
        }
    }
}

fn overlap_ratio<T: Eq + std::hash::Hash>(left: &HashSet<T>, right: &HashSet<T>) -> f64 {
    let largest = left.len().max(right.len());
    if largest == 0 {
        return 0.0;
    }
    left.intersection(right).count() as f64 / largest as f64
}

fn confidence(subject: &Profile<'_>, candidate: &Profile<'_>) -> u8 {
    let mut score = overlap_ratio(&subject.title_words, &candidate.title_words) * TITLE_WEIGHT;

    if !subject.tags.is_empty() && !candidate.tags.is_empty() {
        score += overlap_ratio(&subject.tags, &candidate.tags) * TAG_WEIGHT;
    }

    if let (Some(left), Some(right)) =
        (&subject.description_keywords, &candidate.description_keywords)
    {
        let common = left.intersection(right).count();
        score += (common * DESCRIPTION_POINTS_PER_KEYWORD).min(DESCRIPTION_MAX_POINTS) as f64;
    }

    score.round().clamp(0.0, MAX_CONFIDENCE) as u8
}
