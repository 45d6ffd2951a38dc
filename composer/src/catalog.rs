use serde::Serialize;

/// A programming language the poem can be about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Language {
    pub name: String,
    pub emoji: String,
    /// Accent color used by the page.
    pub color: String,
    /// Concept tags woven into the prompt.
    pub concepts: Vec<String>,
}

/// The voice the AI writes the poem in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Personality {
    pub name: String,
    pub icon: String,
    pub description: String,
    pub color: String,
    /// Trait tags woven into the prompt.
    pub traits: Vec<String>,
}

impl Language {
    pub fn new(
        name: impl Into<String>,
        emoji: impl Into<String>,
        color: impl Into<String>,
        concepts: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            emoji: emoji.into(),
            color: color.into(),
            concepts: concepts.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Personality {
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
        traits: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            description: description.into(),
            color: color.into(),
            traits: traits.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Languages offered on the page, in display order.
pub fn languages() -> Vec<Language> {
    vec![
        Language::new(
            "Python",
            "🐍",
            "#3776ab",
            &["elegant syntax", "data science", "machine learning", "simplicity"],
        ),
        Language::new(
            "JavaScript",
            "⚡",
            "#f7df1e",
            &["async programming", "event loops", "callbacks", "dynamic typing"],
        ),
        Language::new(
            "Rust",
            "🦀",
            "#ce422b",
            &["memory safety", "zero-cost abstractions", "ownership", "performance"],
        ),
        Language::new(
            "Go",
            "🚀",
            "#00add8",
            &["goroutines", "channels", "simplicity", "concurrency"],
        ),
        Language::new(
            "TypeScript",
            "📘",
            "#3178c6",
            &["type safety", "interfaces", "compilation", "scalability"],
        ),
        Language::new(
            "C++",
            "⚙️",
            "#00599c",
            &["templates", "pointers", "performance", "low-level control"],
        ),
    ]
}

/// Personalities offered on the page, in display order.
pub fn personalities() -> Vec<Personality> {
    vec![
        Personality::new(
            "Wise Mentor",
            "🧙",
            "Ancient wisdom meets modern code",
            "#667eea",
            &["philosophical", "patient", "insightful", "nurturing"],
        ),
        Personality::new(
            "Curious Child",
            "🤖",
            "Wonder and excitement in every algorithm",
            "#f093fb",
            &["playful", "questioning", "enthusiastic", "innocent"],
        ),
        Personality::new(
            "Pragmatic Engineer",
            "⚙️",
            "Efficiency and logic drive every decision",
            "#4facfe",
            &["practical", "logical", "solution-focused", "methodical"],
        ),
        Personality::new(
            "Creative Artist",
            "🎨",
            "Code as canvas, algorithms as art",
            "#fa709a",
            &["imaginative", "expressive", "innovative", "aesthetic"],
        ),
        Personality::new(
            "Philosophical Thinker",
            "🤔",
            "Deep contemplation on digital existence",
            "#a8edea",
            &["reflective", "existential", "profound", "contemplative"],
        ),
        Personality::new(
            "Rebellious Hacker",
            "😎",
            "Breaking rules, making new paths",
            "#ff6a00",
            &["unconventional", "bold", "innovative", "disruptive"],
        ),
    ]
}

/// Look up a language by name, ignoring case and surrounding whitespace.
pub fn find_language(name: &str) -> Option<Language> {
    let name = name.trim();
    languages()
        .into_iter()
        .find(|l| l.name.eq_ignore_ascii_case(name))
}

/// Look up a personality by name, ignoring case and surrounding whitespace.
pub fn find_personality(name: &str) -> Option<Personality> {
    let name = name.trim();
    personalities()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}
