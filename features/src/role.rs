//! Speaker role inference.
//!
//! The diarizer only hands out opaque speaker ids. A [`RoleClassifier`]
//! decides which of them is the sales agent; everybody else is a customer.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;
use crate::transcript::RawUtterance;

/// Conversational role of a speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Sales,
    Customer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sales => write!(f, "Sales"),
            Self::Customer => write!(f, "Customer"),
        }
    }
}

/// Maps speaker ids to roles. Ids never seen by the classifier are customers.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleMap {
    sales: String,
    roles: HashMap<String, Role>,
}

impl RoleMap {
    /// Builds a map where `sales` is the sales agent and every other id in
    /// `speakers` is a customer.
    pub fn new<'a>(sales: &str, speakers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut roles: HashMap<String, Role> = speakers
            .into_iter()
            .map(|id| (id.to_string(), Role::Customer))
            .collect();
        roles.insert(sales.to_string(), Role::Sales);
        Self {
            sales: sales.to_string(),
            roles,
        }
    }

    /// Returns the speaker id labeled as sales.
    pub fn sales_speaker(&self) -> &str {
        &self.sales
    }

    pub fn role_of(&self, speaker: &str) -> Role {
        self.roles.get(speaker).copied().unwrap_or(Role::Customer)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Decides which diarized speaker is the sales agent.
pub trait RoleClassifier: Send + Sync {
    /// Classifies every speaker id appearing in `utterances`.
    ///
    /// Returns [`FeatureError::EmptyTranscript`] when there is nothing to
    /// classify.
    fn classify(&self, utterances: &[RawUtterance]) -> Result<RoleMap, FeatureError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Labels the speaker with the most total talk time as sales.
///
/// Talk time is `sum(max(0, end - start))` per id. On an exact tie the id
/// encountered first in the transcript keeps the sales role.
#[derive(Debug, Clone, Copy, Default)]
pub struct TalkTimeClassifier;

impl RoleClassifier for TalkTimeClassifier {
    fn classify(&self, utterances: &[RawUtterance]) -> Result<RoleMap, FeatureError> {
        // Insertion-ordered totals keep the tie-break deterministic.
        let mut totals: Vec<(&str, f64)> = Vec::new();
        for u in utterances {
            match totals.iter_mut().find(|(id, _)| *id == u.speaker) {
                Some((_, total)) => *total += u.span(),
                None => totals.push((u.speaker.as_str(), u.span())),
            }
        }

        let mut leader = totals.first().ok_or(FeatureError::EmptyTranscript)?;
        for entry in &totals[1..] {
            if entry.1 > leader.1 {
                leader = entry;
            }
        }

        Ok(RoleMap::new(leader.0, totals.iter().map(|(id, _)| *id)))
    }

    fn name(&self) -> &'static str {
        "talk_time"
    }
}

/// Labels whoever speaks first as sales (outbound calls open with the agent).
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSpeakerClassifier;

impl RoleClassifier for FirstSpeakerClassifier {
    fn classify(&self, utterances: &[RawUtterance]) -> Result<RoleMap, FeatureError> {
        let first = utterances.first().ok_or(FeatureError::EmptyTranscript)?;
        Ok(RoleMap::new(
            &first.speaker,
            utterances.iter().map(|u| u.speaker.as_str()),
        ))
    }

    fn name(&self) -> &'static str {
        "first_speaker"
    }
}

/// Selects a bundled [`RoleClassifier`] from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleStrategy {
    #[default]
    TalkTime,
    FirstSpeaker,
}

impl RoleStrategy {
    pub fn classifier(self) -> Box<dyn RoleClassifier> {
        match self {
            Self::TalkTime => Box::new(TalkTimeClassifier),
            Self::FirstSpeaker => Box::new(FirstSpeakerClassifier),
        }
    }
}

impl std::str::FromStr for RoleStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "talk_time" => Ok(Self::TalkTime),
            "first_speaker" => Ok(Self::FirstSpeaker),
            other => Err(format!("unknown role strategy: {other}")),
        }
    }
}
