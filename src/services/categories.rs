// src/services/categories.rs

//! Category-to-folder classification.
//!
//! Maps raw wiki category tokens to the hierarchical folder paths the
//! downloader stores images under. The explicit table mirrors the wiki's own
//! categorization; keyword buckets catch categories added after the table
//! was written.

use crate::models::FolderPath;

/// Explicit token-to-folder table. Matched case-insensitively.
const CATEGORY_TABLE: &[(&str, &str)] = &[
    // Weapon categories
    ("weapons", "Weapons"),
    ("assault_rifles", "Weapons/Assault_Rifles"),
    ("sniper_rifles", "Weapons/Sniper_Rifles"),
    ("shotguns", "Weapons/Shotguns"),
    ("submachine_guns", "Weapons/Submachine_Guns"),
    ("pistols", "Weapons/Pistols"),
    ("melee_weapons", "Weapons/Melee"),
    ("ammunition", "Weapons/Ammunition"),
    ("magazines", "Weapons/Magazines"),
    ("weapon_attachments", "Weapons/Attachments"),
    // Equipment categories
    ("equipment", "Equipment"),
    ("backpacks", "Equipment/Backpacks"),
    ("vests", "Equipment/Vests"),
    ("helmets", "Equipment/Helmets"),
    ("eyewear", "Equipment/Eyewear"),
    ("masks", "Equipment/Masks"),
    ("hats", "Equipment/Hats"),
    ("tools", "Equipment/Tools"),
    ("electronics", "Equipment/Electronics"),
    ("base_building", "Equipment/Base_Building"),
    ("containers", "Equipment/Containers"),
    ("resources", "Equipment/Resources"),
    ("books", "Equipment/Books"),
    ("key_cards", "Equipment/Key_Cards"),
    ("vehicle_parts", "Equipment/Vehicle_Parts"),
    // Clothing categories
    ("clothing", "Clothing"),
    ("tops", "Clothing/Tops"),
    ("bottoms", "Clothing/Bottoms"),
    ("shoes", "Clothing/Shoes"),
    ("gloves", "Clothing/Gloves"),
    ("bags", "Clothing/Bags"),
    // Food and medical categories
    ("food", "Food"),
    ("canned_food", "Food/Canned"),
    ("fresh_food", "Food/Fresh"),
    ("drinks", "Food/Drinks"),
    ("cooking", "Food/Cooking"),
    ("seeds", "Food/Seeds"),
    ("medical_items", "Medical"),
];

/// Keyword buckets tried in order when no table entry matches.
const WEAPON_HINTS: &[&str] = &["weapon", "gun", "rifle", "pistol"];
const CLOTHING_HINTS: &[&str] = &["clothing", "apparel", "wear"];
const FOOD_HINTS: &[&str] = &["food", "eat", "drink", "consumable"];
const MEDICAL_HINTS: &[&str] = &["medical", "health", "medicine"];

/// Folder for categories nothing else recognizes.
const FALLBACK_FOLDER: &str = "Equipment/Misc";

/// Map a raw category token to its storage folder.
///
/// Total and deterministic: unknown input always resolves to a folder,
/// never an error.
pub fn map_category(token: &str) -> FolderPath {
    let token = token.to_lowercase();

    if let Some((_, folder)) = CATEGORY_TABLE.iter().find(|(key, _)| *key == token) {
        return FolderPath::new(*folder);
    }

    let contains_any = |hints: &[&str]| hints.iter().any(|hint| token.contains(hint));

    if contains_any(WEAPON_HINTS) {
        FolderPath::new("Weapons")
    } else if contains_any(CLOTHING_HINTS) {
        FolderPath::new("Clothing")
    } else if contains_any(FOOD_HINTS) {
        FolderPath::new("Food")
    } else if contains_any(MEDICAL_HINTS) {
        FolderPath::new("Medical")
    } else {
        FolderPath::new(FALLBACK_FOLDER)
    }
}

/// Extract the category token from a listing page URL.
///
/// Takes the final path segment and strips the `Category:` namespace prefix
/// if present.
pub fn category_token(url: &str) -> &str {
    let segment = url.rsplit('/').next().unwrap_or(url);
    segment.strip_prefix("Category:").unwrap_or(segment)
}
