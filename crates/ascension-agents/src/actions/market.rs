//! Selling loot at a market.

use ascension_types::{ActionKind, Event};
use serde::{Deserialize, Serialize};

use super::contract::{
    ActionContext, ExecutionContext, IneligibleReason, Invocable, Rejection, Sale, StepReport,
    UnresolvedReference,
};
use crate::actor::Actor;
use crate::error::AgentError;

/// Sell units of a named item for spirit stones.
///
/// Without a quantity every held unit is sold. The sale is atomic: either
/// the items leave the inventory and the proceeds arrive, or nothing
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sell {
    /// Item name.
    pub item: String,
    /// Units to sell; `None` sells everything held.
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl Sell {
    /// Sell every held unit of `item`.
    pub fn all(item: &str) -> Self {
        Self {
            item: item.to_owned(),
            quantity: None,
        }
    }
}

impl Invocable for Sell {
    const KIND: ActionKind = ActionKind::Sell;

    fn can_start(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Result<(), Rejection> {
        let at_market = ctx
            .world
            .region_at(actor.position)
            .is_some_and(|region| region.has_market());
        if !at_market {
            return Err(IneligibleReason::NotAtMarket.into());
        }
        let def = ctx
            .world
            .items()
            .find_by_name(&self.item)
            .ok_or_else(|| UnresolvedReference::Item(self.item.clone()))?;
        let held = actor.inventory.quantity(def.id);
        let requested = self.quantity.unwrap_or(held);
        if held == 0 || requested == 0 {
            return Err(IneligibleReason::NothingToSell {
                item: self.item.clone(),
            }
            .into());
        }
        if requested > held {
            return Err(IneligibleReason::InsufficientQuantity {
                item: self.item.clone(),
                held,
                requested,
            }
            .into());
        }
        Ok(())
    }

    fn execute(
        &self,
        actor: &mut Actor,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<StepReport, AgentError> {
        let Some(def) = ctx.world.items().find_by_name(&self.item) else {
            return Ok(StepReport::default());
        };
        let held = actor.inventory.quantity(def.id);
        let quantity = self.quantity.unwrap_or(held);
        if quantity == 0 {
            return Ok(StepReport::default());
        }

        // Everything fallible is computed before either side is touched.
        let proceeds = def
            .price
            .checked_mul(u64::from(quantity))
            .ok_or_else(|| AgentError::overflow("sale proceeds"))?;
        let balance = actor
            .spirit_stones
            .checked_add(proceeds)
            .ok_or_else(|| AgentError::overflow("spirit stone balance"))?;

        match actor.inventory.remove(def.id, quantity) {
            Ok(()) => {}
            Err(AgentError::InsufficientItem {
                requested,
                available,
                ..
            }) => {
                tracing::debug!(
                    actor = %actor.id,
                    item = %self.item,
                    requested,
                    available,
                    "sale aborted: not enough held"
                );
                return Ok(StepReport::default());
            }
            Err(other) => return Err(other),
        }
        actor.spirit_stones = balance;

        tracing::debug!(actor = %actor.id, item = %self.item, quantity, proceeds, "sold");
        Ok(StepReport {
            sale: Some(Sale {
                item: def.id,
                quantity,
                proceeds,
            }),
            events: vec![Event::minor(
                ctx.tick,
                format!(
                    "{} sold {quantity} {} for {proceeds} spirit stones",
                    actor.name, self.item
                ),
                vec![actor.id],
            )],
            ..StepReport::default()
        })
    }

    fn event(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Event {
        Event::minor(
            ctx.tick,
            format!("{} brings {} to market", actor.name, self.item),
            vec![actor.id],
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_types::Root;

    use super::*;
    use crate::actions::fixtures::{FOREST, Harness, MARKET};

    #[test]
    fn selling_everything_credits_price_times_quantity() {
        let mut h = Harness::new();
        let fur = h.item("Rabbit Fur");
        let mut actor = h.actor("Lin", Root::Metal, MARKET);
        actor.inventory.add(fur, 4).unwrap();
        let sell = Sell::all("Rabbit Fur");
        assert!(sell.is_doable(&actor, &h.view(0)));

        let report = h.run(&sell, &mut actor, 0);
        assert_eq!(
            report.sale,
            Some(Sale {
                item: fur,
                quantity: 4,
                proceeds: 20
            })
        );
        assert_eq!(actor.spirit_stones, 20);
        assert_eq!(actor.inventory.quantity(fur), 0);
    }

    #[test]
    fn partial_sale_keeps_the_rest() {
        let mut h = Harness::new();
        let bone = h.item("Tiger Bone");
        let mut actor = h.actor("Lin", Root::Metal, MARKET);
        actor.inventory.add(bone, 3).unwrap();
        let sell = Sell {
            item: String::from("Tiger Bone"),
            quantity: Some(2),
        };
        h.run(&sell, &mut actor, 0);
        assert_eq!(actor.inventory.quantity(bone), 1);
        assert_eq!(actor.spirit_stones, 160);
    }

    #[test]
    fn overselling_changes_nothing() {
        let mut h = Harness::new();
        let fur = h.item("Rabbit Fur");
        let mut actor = h.actor("Lin", Root::Metal, MARKET);
        actor.inventory.add(fur, 2).unwrap();
        actor.spirit_stones = 9;
        let sell = Sell {
            item: String::from("Rabbit Fur"),
            quantity: Some(5),
        };

        assert_eq!(
            sell.can_start(&actor, &h.view(0)),
            Err(IneligibleReason::InsufficientQuantity {
                item: String::from("Rabbit Fur"),
                held: 2,
                requested: 5,
            }
            .into())
        );
        let report = h.run(&sell, &mut actor, 0);
        assert_eq!(report, StepReport::default());
        assert_eq!(actor.inventory.quantity(fur), 2);
        assert_eq!(actor.spirit_stones, 9);
    }

    #[test]
    fn overflowing_balance_is_an_error_and_changes_nothing() {
        let mut h = Harness::new();
        let fur = h.item("Rabbit Fur");
        let mut actor = h.actor("Lin", Root::Metal, MARKET);
        actor.inventory.add(fur, 1).unwrap();
        actor.spirit_stones = u64::MAX;

        let mut ctx = ExecutionContext {
            tick: 0,
            world: &h.world,
            rules: &h.rules,
            actors: &mut h.actors,
            rng: &mut h.rng,
            resolver: h.resolver.as_mut(),
        };
        let result = Sell::all("Rabbit Fur").execute(&mut actor, &mut ctx);
        assert!(matches!(result, Err(AgentError::ArithmeticOverflow { .. })));
        assert_eq!(actor.inventory.quantity(fur), 1);
    }

    #[test]
    fn selling_needs_a_market_and_a_known_item() {
        let h = Harness::new();
        let fur = h.item("Rabbit Fur");
        let mut away = h.actor("Lin", Root::Metal, FOREST);
        away.inventory.add(fur, 1).unwrap();
        assert_eq!(
            Sell::all("Rabbit Fur").can_start(&away, &h.view(0)),
            Err(IneligibleReason::NotAtMarket.into())
        );

        let here = h.actor("Mei", Root::Metal, MARKET);
        let unknown = Sell::all("Dragon Scale").can_start(&here, &h.view(0));
        assert!(unknown.unwrap_err().is_unresolved());
        assert_eq!(
            Sell::all("Rabbit Fur").can_start(&here, &h.view(0)),
            Err(IneligibleReason::NothingToSell {
                item: String::from("Rabbit Fur")
            }
            .into())
        );
    }
}
