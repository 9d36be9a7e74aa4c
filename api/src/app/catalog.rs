//! Static content of the chat page: quotes and example questions.

use serde::Serialize;

pub static QUOTES: [&str; 5] = [
    "⚡ 'It is our choices, Harry, that show what we truly are, far more than our abilities.' - Dumbledore",
    "🦌 'Happiness can be found, even in the darkest of times, if one only remembers to turn on the light.' - Dumbledore",
    "🪶 'Words are, in my not-so-humble opinion, our most inexhaustible source of magic.' - Dumbledore",
    "🔮 'It does not do to dwell on dreams and forget to live.' - Dumbledore",
    "⭐ 'We've all got both light and dark inside us. What matters is the part we choose to act on.' - Sirius Black",
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExampleCategory {
    pub title: &'static str,
    pub examples: &'static [&'static str],
}

pub static EXAMPLE_CATEGORIES: [ExampleCategory; 4] = [
    ExampleCategory {
        title: "🧙‍♂️ Character Analysis",
        examples: &[
            "How does Snape's character develop throughout the series?",
            "What are the key traits of Hermione Granger?",
            "Describe Harry's relationship with his father figures",
            "How does Draco Malfoy change over the books?",
        ],
    },
    ExampleCategory {
        title: "📚 Plot & Events",
        examples: &[
            "Summarize the Triwizard Tournament from Goblet of Fire",
            "What happens during the Battle of Hogwarts?",
            "Explain the events of the Department of Mysteries",
            "Tell me about Harry's first Quidditch match",
        ],
    },
    ExampleCategory {
        title: "🔍 Trivia & Details",
        examples: &[
            "What is Harry Potter's patronus and how did he learn it?",
            "What are the Deathly Hallows and their significance?",
            "How do you make a Polyjuice Potion?",
            "Who are the original members of the Order of the Phoenix?",
        ],
    },
    ExampleCategory {
        title: "🏰 World Building",
        examples: &[
            "Describe the different houses at Hogwarts",
            "What is the history of the Marauder's Map?",
            "Explain the wizarding government structure",
            "Tell me about magical creatures in the series",
        ],
    },
];

/// Quote shown on a freshly rendered page. Picks by the sub-second clock.
pub fn quote_of_the_moment() -> &'static str {
    let nanos = chrono::Utc::now().timestamp_subsec_nanos() as usize;
    QUOTES[nanos % QUOTES.len()]
}

/// Every example question, in catalog order.
pub fn all_examples() -> impl Iterator<Item = &'static str> {
    EXAMPLE_CATEGORIES
        .iter()
        .flat_map(|c| c.examples.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_shape() {
        assert_eq!(EXAMPLE_CATEGORIES.len(), 4);
        assert!(EXAMPLE_CATEGORIES.iter().all(|c| c.examples.len() == 4));
        assert_eq!(all_examples().count(), 16);
    }

    #[test]
    fn quote_is_from_the_list() {
        assert!(QUOTES.contains(&quote_of_the_moment()));
    }
}
