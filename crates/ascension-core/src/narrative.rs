//! The story-teller seam.
//!
//! When an action that yields a [`NarrativeFact`] completes, the driver asks
//! a [`StoryTeller`] for flavor text and records it as a story event. The
//! story teller never sees or touches rule state. [`PlainStoryTeller`] is a
//! template-based default; richer implementations plug in behind the trait.

use ascension_types::NarrativeFact;

/// Turns structured facts into prose.
pub trait StoryTeller: Send {
    /// Flavor text for one fact.
    fn tell(&mut self, fact: &NarrativeFact) -> String;
}

/// Fixed sentence templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStoryTeller;

impl StoryTeller for PlainStoryTeller {
    fn tell(&mut self, fact: &NarrativeFact) -> String {
        match fact {
            NarrativeFact::Breakthrough {
                actor_name,
                from,
                to,
                success: true,
                probability,
                ..
            } => format!(
                "Against odds of {:.0}%, {actor_name} shattered the barrier of {} and \
                 ascended to {}.",
                probability * 100.0,
                from.display_name(),
                to.display_name()
            ),
            NarrativeFact::Breakthrough {
                actor_name,
                from,
                lifespan_lost,
                ..
            } => format!(
                "{actor_name} assaulted the barrier of {} and was thrown back; the \
                 backlash cost {lifespan_lost} years of life.",
                from.display_name()
            ),
            NarrativeFact::Battle {
                winner_name,
                loser_name,
                loser_died: true,
                ..
            } => format!("{winner_name} struck down {loser_name}, who did not rise again."),
            NarrativeFact::Battle {
                winner_name,
                loser_name,
                ..
            } => format!("{winner_name} bested {loser_name}, who withdrew to tend their wounds."),
        }
    }
}

#[cfg(test)]
mod tests {
    use ascension_types::Realm;

    use super::*;

    #[test]
    fn success_mentions_both_realms() {
        let text = PlainStoryTeller.tell(&NarrativeFact::Breakthrough {
            actor_name: String::from("Lin"),
            from: Realm::QiRefinement,
            to: Realm::FoundationEstablishment,
            success: true,
            probability: 0.65,
            lifespan_lost: 0,
        });
        assert!(text.contains("65%"));
        assert!(text.contains("Qi Refinement"));
        assert!(text.contains("Foundation Establishment"));
    }

    #[test]
    fn failure_mentions_the_cost() {
        let text = PlainStoryTeller.tell(&NarrativeFact::Breakthrough {
            actor_name: String::from("Lin"),
            from: Realm::CoreFormation,
            to: Realm::CoreFormation,
            success: false,
            probability: 0.3,
            lifespan_lost: 20,
        });
        assert!(text.contains("20 years"));
    }

    #[test]
    fn battle_text_depends_on_death() {
        let fatal = PlainStoryTeller.tell(&NarrativeFact::Battle {
            winner_name: String::from("Lin"),
            loser_name: String::from("Mei"),
            loser_died: true,
            metadata: serde_json::Value::Null,
        });
        assert!(fatal.contains("did not rise"));
    }
}
