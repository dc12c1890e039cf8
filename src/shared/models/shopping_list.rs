/**
 * Shopping List Types
 *
 * Items are embedded in the list document. Adding a recipe turns each of its
 * ingredients into an item; an ingredient merges into an open item with the
 * same name and unit when both amounts are numeric, otherwise it becomes a
 * separate line.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recipe::Ingredient;
use crate::shared::error::{require_text, SharedError};

/// One line on a shopping list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingItem {
    pub id: Uuid,
    pub name: String,
    pub amount: String,
    pub unit: String,
    pub completed: bool,
    pub added_by: Uuid,
}

impl ShoppingItem {
    pub fn new(name: &str, amount: &str, unit: &str, added_by: Uuid) -> Result<Self, SharedError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: require_text("name", name)?,
            amount: amount.trim().to_string(),
            unit: unit.trim().to_string(),
            completed: false,
            added_by,
        })
    }

    fn same_product(&self, name: &str, unit: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim()) && self.unit.eq_ignore_ascii_case(unit.trim())
    }
}

/// Entry in the log of recipes pushed onto a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeLogEntry {
    pub recipe: Uuid,
    pub added_by: Uuid,
    pub added_at: DateTime<Utc>,
}

/// Stored shopping list document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingList {
    pub id: Uuid,
    pub name: String,
    pub items: Vec<ShoppingItem>,
    pub owner_id: Uuid,
    pub invited_users: Vec<Uuid>,
    pub recipes_added: Vec<RecipeLogEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShoppingList {
    pub fn new(owner_id: Uuid, name: &str) -> Result<Self, SharedError> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: require_text("name", name)?,
            items: Vec::new(),
            owner_id,
            invited_users: Vec::new(),
            recipes_added: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.is_owner(user_id) || self.invited_users.contains(&user_id)
    }

    pub fn item_mut(&mut self, item_id: Uuid) -> Option<&mut ShoppingItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    pub fn remove_item(&mut self, item_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != item_id);
        self.items.len() != before
    }

    /// Drop completed items, returning how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.completed);
        before - self.items.len()
    }

    /// Add one ingredient, merging into a matching open item where possible.
    pub fn add_ingredient(&mut self, ingredient: &Ingredient, added_by: Uuid) -> Result<(), SharedError> {
        let existing = self
            .items
            .iter_mut()
            .find(|item| !item.completed && item.same_product(&ingredient.name, &ingredient.unit));

        if let Some(item) = existing {
            if let Some(total) = merge_amounts(&item.amount, &ingredient.amount) {
                item.amount = total;
                return Ok(());
            }
        }

        let item = ShoppingItem::new(&ingredient.name, &ingredient.amount, &ingredient.unit, added_by)?;
        self.items.push(item);
        Ok(())
    }

    /// Push every ingredient of a recipe and log it.
    pub fn add_recipe(
        &mut self,
        recipe_id: Uuid,
        ingredients: &[Ingredient],
        added_by: Uuid,
    ) -> Result<(), SharedError> {
        for ingredient in ingredients.iter().filter(|i| !i.name.trim().is_empty()) {
            self.add_ingredient(ingredient, added_by)?;
        }
        self.recipes_added.push(RecipeLogEntry {
            recipe: recipe_id,
            added_by,
            added_at: Utc::now(),
        });
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Largest magnitude below which every integer is exact in an `f64`
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Sum two amounts when both parse as finite numbers.
pub fn merge_amounts(left: &str, right: &str) -> Option<String> {
    let left = parse_amount(left)?;
    let right = parse_amount(right)?;
    let sum = left + right;
    sum.is_finite().then(|| format_amount(sum))
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Whole numbers print without a fraction, anything else in its shortest
/// round-trip form.
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < EXACT_INTEGER_LIMIT {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateShoppingListRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateShoppingListRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddItemRequest {
    pub name: String,
    pub amount: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub unit: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddRecipeToListRequest {
    pub recipe_id: Option<Uuid>,
}
