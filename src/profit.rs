//! Profit evaluation: sale revenue versus cheapest acquisition cost.
//!
//! A recipe's revenue is its output quantity times the best sale
//! channel actually open for the output item (market instant-sell for
//! tradeable items, vendor value otherwise). Its cost is the sum of the
//! resolver's cheapest per-unit ingredient costs. Any unpriceable
//! ingredient makes the whole recipe's cost `Unavailable`, which ranks
//! below every finite-cost alternative and reports as "not profitable",
//! never as an error.

use crate::coin::format_cost;
use crate::model::{AcquireMethod, Cost, Item, Recipe};
use crate::resolver::{CostResolver, CostSource};
use crate::store::Catalog;

/// One step of an executable crafting plan.
#[derive(Debug, Clone)]
pub struct PlanLine {
    pub verb: &'static str,
    pub count: u32,
    pub item_id: u32,
    pub method: String,
    pub total: Cost,
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub recipe_uid: u64,
    pub game_id: u32,
    pub is_altered: bool,
    pub needs_recipe: bool,
    pub output_item: u32,
    pub output_quantity: u32,
    pub sell_method: AcquireMethod,
    pub revenue: Cost,
    pub cost: Cost,
    pub lines: Vec<PlanLine>,
}

impl Evaluation {
    pub fn profit(&self) -> Cost {
        match (self.revenue, self.cost) {
            (Cost::Coin(r), Cost::Coin(c)) => Cost::Coin(r - c),
            _ => Cost::Unavailable,
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.profit().value().is_some_and(|p| p > 0.0)
    }

    /// Profit over cost, when both are finite and the cost is positive.
    pub fn roi(&self) -> Option<f64> {
        let profit = self.profit().value()?;
        let cost = self.cost.value()?;
        (cost > 0.0).then(|| profit / cost)
    }

    /// Ranking key: unavailable profit sorts below every finite profit.
    fn profit_key(&self) -> f64 {
        self.profit().value().unwrap_or(f64::NEG_INFINITY)
    }
}

/// Best sale channel for an item: the higher of market instant-sell
/// (tradeable items only) and vendor value. Market wins ties.
pub fn sale_price(item: &Item) -> (AcquireMethod, Cost) {
    let market = if item.bound { None } else { item.tp_value };
    let vendor = (item.vendor_value > 0).then_some(item.vendor_value);

    match (market, vendor) {
        (Some(m), Some(v)) if v > m => (AcquireMethod::Vendor, Cost::coin(v as f64)),
        (Some(m), _) => (AcquireMethod::Market, Cost::coin(m as f64)),
        (None, Some(v)) => (AcquireMethod::Vendor, Cost::coin(v as f64)),
        (None, None) => (AcquireMethod::None, Cost::Unavailable),
    }
}

/// Run-scoped evaluation context: owns the cost memo (inside the
/// resolver) and the per-recipe evaluation memo. Create one per batch
/// run; nothing is shared across unrelated runs.
pub struct ProfitEvaluator<'a> {
    catalog: &'a Catalog,
    resolver: CostResolver<'a>,
    evaluated: std::collections::HashMap<u64, Evaluation>,
}

impl<'a> ProfitEvaluator<'a> {
    pub fn new(catalog: &'a Catalog, karma_per_coin: f64) -> Self {
        Self {
            catalog,
            resolver: CostResolver::new(catalog, karma_per_coin),
            evaluated: std::collections::HashMap::new(),
        }
    }

    /// Drop both memo maps after a price refresh.
    pub fn reset(&mut self) {
        self.resolver.reset();
        self.evaluated.clear();
    }

    pub fn evaluate(&mut self, recipe: &Recipe) -> Evaluation {
        if let Some(hit) = self.evaluated.get(&recipe.unique_id) {
            return hit.clone();
        }
        let evaluation = self.evaluate_fresh(recipe);
        self.evaluated
            .insert(recipe.unique_id, evaluation.clone());
        evaluation
    }

    fn evaluate_fresh(&mut self, recipe: &Recipe) -> Evaluation {
        let (sell_method, sale_unit) = self
            .catalog
            .item(recipe.output_item)
            .map(sale_price)
            .unwrap_or((AcquireMethod::None, Cost::Unavailable));
        let revenue = sale_unit.scale(recipe.output_quantity);

        let mut cost = Cost::coin(0.0);
        let mut lines = Vec::with_capacity(recipe.ingredients.len() + 1);
        for ing in &recipe.ingredients {
            let resolution = self.resolver.unit_cost(ing.item_id);
            let (verb, method) = match &resolution.source {
                CostSource::Buy(m) => ("buy", m.to_string()),
                CostSource::Craft { .. } => ("craft", "craft".to_string()),
                CostSource::Unavailable => ("buy", "none".to_string()),
            };
            lines.push(PlanLine {
                verb,
                count: ing.count,
                item_id: ing.item_id,
                method,
                total: resolution.cost.scale(ing.count),
            });
            cost = cost.saturating_add(resolution.cost.scale(ing.count));
        }
        lines.push(PlanLine {
            verb: "sell",
            count: recipe.output_quantity,
            item_id: recipe.output_item,
            method: sell_method.to_string(),
            total: revenue,
        });

        Evaluation {
            recipe_uid: recipe.unique_id,
            game_id: recipe.game_id,
            is_altered: recipe.is_altered,
            needs_recipe: recipe.needs_recipe,
            output_item: recipe.output_item,
            output_quantity: recipe.output_quantity,
            sell_method,
            revenue,
            cost,
            lines,
        }
    }

    fn best_of(&mut self, uids: Vec<u64>) -> Option<Evaluation> {
        let mut best: Option<Evaluation> = None;
        for uid in uids {
            let Some(recipe) = self.catalog.recipe(uid) else {
                continue;
            };
            let recipe = recipe.clone();
            let evaluation = self.evaluate(&recipe);
            let better = match &best {
                Some(current) => evaluation.profit_key() > current.profit_key(),
                None => true,
            };
            if better {
                best = Some(evaluation);
            }
        }
        best
    }

    /// The maximum-profit recipe (base or derived) producing `item_id`.
    pub fn best_for_output(&mut self, item_id: u32) -> Option<Evaluation> {
        let mut uids = self.catalog.recipes_by_output(item_id).to_vec();
        uids.sort_unstable();
        self.best_of(uids)
    }

    /// The maximum-profit stored variant of one game recipe.
    pub fn best_for_game_recipe(&mut self, game_id: u32) -> Option<Evaluation> {
        let uids = self
            .catalog
            .game_recipe_variants(game_id)
            .iter()
            .map(|r| r.unique_id)
            .collect();
        self.best_of(uids)
    }

    /// Cheapest-acquisition breakdown tree for one item.
    pub fn breakdown(&mut self, item_id: u32) -> Vec<String> {
        self.resolver.breakdown(item_id)
    }

    /// Render an evaluation as a step-by-step plan: one line per
    /// buy/craft, then the sale.
    pub fn render_plan(&self, evaluation: &Evaluation) -> String {
        let mut out = String::new();
        for line in &evaluation.lines {
            let name = self
                .catalog
                .item(line.item_id)
                .map(|i| i.name.as_str())
                .unwrap_or("unknown item");
            out.push_str(&format!(
                "• {} {} {} at {} for {}\n",
                line.verb,
                line.count,
                name,
                line.method,
                format_cost(line.total)
            ));
        }
        out
    }
}
