// src/store.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::grading::GradingResult;
use crate::models::exam::Exam;
use crate::models::question::{Answer, Difficulty, Question};
use crate::models::submission::StudentResult;
use crate::models::topic::Topic;

/// Fields of a question before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub topic_id: i64,
    pub level: Difficulty,
    pub content: String,
    pub analysis: Option<String>,
    pub answers: Vec<Answer>,
}

/// Fields of an exam before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewExam {
    pub code: String,
    pub name: String,
    pub topic_id: i64,
    pub duration_minutes: u32,
    pub questions: Vec<Question>,
}

/// Optional filters for question listing.
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub topic_id: Option<i64>,
    pub level: Option<Difficulty>,
    /// Case-insensitive substring match on content.
    pub q: Option<String>,
}

/// Storage collaborator for the service. The grading and spec-validation
/// cores never touch this; handlers fetch values here and pass them in.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_topic(&self, name: String, subject: Option<String>) -> Topic;
    async fn list_topics(&self) -> Vec<Topic>;
    async fn topic_ids(&self) -> Vec<i64>;
    async fn delete_topic(&self, id: i64) -> bool;

    async fn insert_question(&self, question: NewQuestion) -> Question;
    async fn get_question(&self, id: i64) -> Option<Question>;
    async fn list_questions(&self, filter: &QuestionFilter) -> Vec<Question>;
    async fn update_question(&self, id: i64, question: NewQuestion) -> Option<Question>;
    async fn delete_question(&self, id: i64) -> bool;
    /// Draws up to `n` random questions of one tier from a topic pool.
    /// Returns fewer than `n` when the pool is too small; the caller decides
    /// whether that is an error.
    async fn sample_questions(&self, topic_id: i64, level: Difficulty, n: usize) -> Vec<Question>;

    async fn insert_exam(&self, exam: NewExam) -> Exam;
    async fn list_exams(&self) -> Vec<Exam>;
    async fn get_exam(&self, id: i64) -> Option<Exam>;
    async fn get_exam_by_code(&self, code: &str) -> Option<Exam>;
    async fn delete_exam(&self, id: i64) -> bool;

    async fn insert_result(&self, exam_id: i64, student_id: i64, grading: GradingResult) -> StudentResult;
    async fn get_result(&self, id: i64) -> Option<StudentResult>;
    async fn update_result(&self, id: i64, grading: GradingResult) -> Option<StudentResult>;
    async fn list_results(&self, exam_id: i64) -> Vec<StudentResult>;
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    topics: BTreeMap<i64, Topic>,
    questions: BTreeMap<i64, Question>,
    exams: BTreeMap<i64, Exam>,
    results: BTreeMap<i64, StudentResult>,
}

impl Inner {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory store. All maps sit behind one lock; every operation takes it
/// exactly once, so there are no cross-map consistency windows.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Loads a JSON seed file of topics and questions. Questions reference
    /// topics by name. Returns (topics, questions) inserted.
    pub async fn load_seed(&self, json: &str) -> Result<(usize, usize), serde_json::Error> {
        let seed: SeedFile = serde_json::from_str(json)?;

        let mut topic_ids = BTreeMap::new();
        for topic in &seed.topics {
            let inserted = self
                .insert_topic(topic.name.clone(), topic.subject.clone())
                .await;
            topic_ids.insert(topic.name.clone(), inserted.id);
        }

        let mut inserted_questions = 0;
        for question in &seed.questions {
            let Some(&topic_id) = topic_ids.get(&question.topic) else {
                tracing::warn!("Seed question references unknown topic '{}', skipping", question.topic);
                continue;
            };
            self.insert_question(NewQuestion {
                topic_id,
                level: question.level,
                content: question.content.clone(),
                analysis: question.analysis.clone(),
                answers: question.answers.clone(),
            })
            .await;
            inserted_questions += 1;
        }

        Ok((seed.topics.len(), inserted_questions))
    }
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    topics: Vec<SeedTopic>,
    #[serde(default)]
    questions: Vec<SeedQuestion>,
}

#[derive(Debug, Deserialize)]
struct SeedTopic {
    name: String,
    subject: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedQuestion {
    topic: String,
    level: Difficulty,
    content: String,
    analysis: Option<String>,
    answers: Vec<Answer>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_topic(&self, name: String, subject: Option<String>) -> Topic {
        let mut inner = self.inner.write().await;
        let id = inner.allocate_id();
        let topic = Topic {
            id,
            name,
            subject,
            created_at: Some(chrono::Utc::now()),
        };
        inner.topics.insert(id, topic.clone());
        topic
    }

    async fn list_topics(&self) -> Vec<Topic> {
        self.inner.read().await.topics.values().cloned().collect()
    }

    async fn topic_ids(&self) -> Vec<i64> {
        self.inner.read().await.topics.keys().copied().collect()
    }

    async fn delete_topic(&self, id: i64) -> bool {
        self.inner.write().await.topics.remove(&id).is_some()
    }

    async fn insert_question(&self, question: NewQuestion) -> Question {
        let mut inner = self.inner.write().await;
        let id = inner.allocate_id();
        let question = Question {
            id,
            topic_id: question.topic_id,
            level: question.level,
            content: question.content,
            analysis: question.analysis,
            answers: question.answers,
            created_at: Some(chrono::Utc::now()),
        };
        inner.questions.insert(id, question.clone());
        question
    }

    async fn get_question(&self, id: i64) -> Option<Question> {
        self.inner.read().await.questions.get(&id).cloned()
    }

    async fn list_questions(&self, filter: &QuestionFilter) -> Vec<Question> {
        let needle = filter.q.as_ref().map(|q| q.to_lowercase());
        self.inner
            .read()
            .await
            .questions
            .values()
            .filter(|q| filter.topic_id.is_none_or(|id| q.topic_id == id))
            .filter(|q| filter.level.is_none_or(|level| q.level == level))
            .filter(|q| {
                needle
                    .as_ref()
                    .is_none_or(|needle| q.content.to_lowercase().contains(needle))
            })
            .cloned()
            .collect()
    }

    async fn update_question(&self, id: i64, question: NewQuestion) -> Option<Question> {
        let mut inner = self.inner.write().await;
        let existing = inner.questions.get_mut(&id)?;
        existing.topic_id = question.topic_id;
        existing.level = question.level;
        existing.content = question.content;
        existing.analysis = question.analysis;
        existing.answers = question.answers;
        Some(existing.clone())
    }

    async fn delete_question(&self, id: i64) -> bool {
        self.inner.write().await.questions.remove(&id).is_some()
    }

    async fn sample_questions(&self, topic_id: i64, level: Difficulty, n: usize) -> Vec<Question> {
        let inner = self.inner.read().await;
        let pool: Vec<&Question> = inner
            .questions
            .values()
            .filter(|q| q.topic_id == topic_id && q.level == level)
            .collect();
        let mut rng = rand::thread_rng();
        pool.choose_multiple(&mut rng, n)
            .map(|q| (*q).clone())
            .collect()
    }

    async fn insert_exam(&self, exam: NewExam) -> Exam {
        let mut inner = self.inner.write().await;
        let id = inner.allocate_id();
        let exam = Exam {
            id,
            code: exam.code,
            name: exam.name,
            topic_id: exam.topic_id,
            duration_minutes: exam.duration_minutes,
            questions: exam.questions,
            created_at: Some(chrono::Utc::now()),
        };
        inner.exams.insert(id, exam.clone());
        exam
    }

    async fn list_exams(&self) -> Vec<Exam> {
        self.inner.read().await.exams.values().cloned().collect()
    }

    async fn get_exam(&self, id: i64) -> Option<Exam> {
        self.inner.read().await.exams.get(&id).cloned()
    }

    async fn get_exam_by_code(&self, code: &str) -> Option<Exam> {
        self.inner
            .read()
            .await
            .exams
            .values()
            .find(|e| e.code == code)
            .cloned()
    }

    async fn delete_exam(&self, id: i64) -> bool {
        let mut inner = self.inner.write().await;
        let removed = inner.exams.remove(&id).is_some();
        if removed {
            inner.results.retain(|_, r| r.exam_id != id);
        }
        removed
    }

    async fn insert_result(&self, exam_id: i64, student_id: i64, grading: GradingResult) -> StudentResult {
        let mut inner = self.inner.write().await;
        let id = inner.allocate_id();
        let result = StudentResult {
            id,
            exam_id,
            student_id,
            grading,
            created_at: Some(chrono::Utc::now()),
        };
        inner.results.insert(id, result.clone());
        result
    }

    async fn get_result(&self, id: i64) -> Option<StudentResult> {
        self.inner.read().await.results.get(&id).cloned()
    }

    async fn update_result(&self, id: i64, grading: GradingResult) -> Option<StudentResult> {
        let mut inner = self.inner.write().await;
        let existing = inner.results.get_mut(&id)?;
        existing.grading = grading;
        Some(existing.clone())
    }

    async fn list_results(&self, exam_id: i64) -> Vec<StudentResult> {
        self.inner
            .read()
            .await
            .results
            .values()
            .filter(|r| r.exam_id == exam_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_question(topic_id: i64, level: Difficulty, content: &str) -> NewQuestion {
        NewQuestion {
            topic_id,
            level,
            content: content.to_string(),
            analysis: None,
            answers: vec![
                Answer {
                    code: "A".to_string(),
                    content: "Yes".to_string(),
                    is_correct: true,
                },
                Answer {
                    code: "B".to_string(),
                    content: "No".to_string(),
                    is_correct: false,
                },
            ],
        }
    }

    #[tokio::test]
    async fn sampling_never_exceeds_the_pool() {
        let store = MemoryStore::new();
        let topic = store.insert_topic("Algebra".to_string(), None).await;
        for i in 0..3 {
            store
                .insert_question(new_question(topic.id, Difficulty::Easy, &format!("Q{}", i)))
                .await;
        }

        assert_eq!(store.sample_questions(topic.id, Difficulty::Easy, 2).await.len(), 2);
        assert_eq!(store.sample_questions(topic.id, Difficulty::Easy, 10).await.len(), 3);
        assert!(store.sample_questions(topic.id, Difficulty::Hard, 1).await.is_empty());
    }

    #[tokio::test]
    async fn question_filters_compose() {
        let store = MemoryStore::new();
        let algebra = store.insert_topic("Algebra".to_string(), None).await;
        let geometry = store.insert_topic("Geometry".to_string(), None).await;
        store
            .insert_question(new_question(algebra.id, Difficulty::Easy, "Solve x + 1 = 2"))
            .await;
        store
            .insert_question(new_question(algebra.id, Difficulty::Hard, "Factor the polynomial"))
            .await;
        store
            .insert_question(new_question(geometry.id, Difficulty::Easy, "Angle sum of a triangle"))
            .await;

        let filter = QuestionFilter {
            topic_id: Some(algebra.id),
            ..Default::default()
        };
        assert_eq!(store.list_questions(&filter).await.len(), 2);

        let filter = QuestionFilter {
            topic_id: Some(algebra.id),
            level: Some(Difficulty::Hard),
            ..Default::default()
        };
        assert_eq!(store.list_questions(&filter).await.len(), 1);

        let filter = QuestionFilter {
            q: Some("TRIANGLE".to_string()),
            ..Default::default()
        };
        assert_eq!(store.list_questions(&filter).await.len(), 1);
    }

    #[tokio::test]
    async fn seed_file_loads_topics_and_questions() {
        let store = MemoryStore::new();
        let seed = serde_json::json!({
            "topics": [{"name": "Chemistry", "subject": "Science"}],
            "questions": [{
                "topic": "Chemistry",
                "level": "EASY",
                "content": "Symbol for water?",
                "analysis": null,
                "answers": [
                    {"code": "A", "content": "H2O", "is_correct": true},
                    {"code": "B", "content": "CO2", "is_correct": false}
                ]
            }, {
                "topic": "Unknown",
                "level": "EASY",
                "content": "Dropped",
                "analysis": null,
                "answers": []
            }]
        });

        let (topics, questions) = store.load_seed(&seed.to_string()).await.unwrap();
        assert_eq!(topics, 1);
        assert_eq!(questions, 1);
        assert_eq!(store.topic_ids().await.len(), 1);
    }
}
