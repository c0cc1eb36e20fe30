use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

const DETAILED_TEMPLATE: &str = r#"Answer the question based on the following context:
{context}

Based on the given subtitle/dialogues below:
{question}

Provide the following details strictly based on the context and
show in below format

1. The title of the movie or web series, or TV show.
DONT SHOW THE BELOW LINE IF YOU DIDNT FIND IN THE CONTEXT VERY STRICTLY
2. The year of release.
SHOW THE 3RD POINT IF ITS A WEBSERIES OR ELSE DONT PRINT THE BELOW LINE VERY STRICTLY
3. the season and episode number. (show this only if its webseries)

Do not include any ID (VERY STRICTLY)
Do not add any extra information.
Do not justify your answers.
DO NOT MENTION Not SPECIFIED
DO NOT MENTION NOT APPLICABLE
DO NOT MENTION NOT FOUND
DO NOT MENTION N/A

Avoid phrases like "according to the context/question" or "mentioned in the context/question."
Simply provide the requested details.
"#;

const COMPACT_TEMPLATE: &str = r#"Answer based only on the following context:
{context}

Based on the given subtitle/dialogues:
{question}

Return the result strictly in this format (no extra words, no numbering, no labels):
<Movie/Show Name>, <Year of Release>
"#;

/// Prompt and retrieval depth used to identify a movie from its dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProfile {
    /// Title, year and, for series, season and episode.
    #[default]
    Detailed,
    /// A single `<name>, <year>` line.
    Compact,
}

impl SearchProfile {
    pub fn top_k(&self) -> usize {
        match self {
            SearchProfile::Detailed => 5,
            SearchProfile::Compact => 10,
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            SearchProfile::Detailed => DETAILED_TEMPLATE,
            SearchProfile::Compact => COMPACT_TEMPLATE,
        }
    }

    pub fn render(&self, context: &str, question: &str) -> String {
        self.template()
            .replace("{context}", context)
            .replace("{question}", question)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchProfile::Detailed => "detailed",
            SearchProfile::Compact => "compact",
        }
    }
}

impl FromStr for SearchProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "compact" => Ok(Self::Compact),
            other => Err(format!(
                "Invalid search profile: {}. Expected: detailed or compact",
                other
            )),
        }
    }
}

impl fmt::Display for SearchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
