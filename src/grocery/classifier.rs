//! Ingredient category classification
//!
//! Maps a free-text ingredient name to a grocery category by keyword
//! substring matching against a fixed, ordered table.

use super::category::GroceryCategory;

/// Keyword table in priority order. The first category with a keyword
/// contained in the normalized name wins, so earlier rows shadow later ones
/// ("eggplant" is Produce before "egg" is seen under Dairy & Eggs).
static CATEGORY_KEYWORDS: &[(GroceryCategory, &[&str])] = &[
    (
        GroceryCategory::Produce,
        &[
            "tomato", "onion", "garlic", "shallot", "scallion", "leek", "lettuce", "spinach",
            "kale", "arugula", "cabbage", "carrot", "celery", "cucumber", "zucchini",
            "broccoli", "cauliflower", "bell pepper", "jalapeno", "jalapeño", "potato",
            "mushroom", "avocado", "eggplant", "squash", "pumpkin", "green beans",
            "green peas", "snap peas", "snow peas", "sweet corn", "asparagus", "beet",
            "radish", "ginger", "cilantro", "parsley", "basil", "mint", "veggie", "apple",
            "banana", "orange", "lemon", "lime", "berry", "berries", "grape", "mango",
            "peach", "pear", "cherry", "cherries", "melon", "kiwi", "plum", "fig",
        ],
    ),
    (
        GroceryCategory::MeatSeafood,
        &[
            "chicken", "beef", "pork", "lamb", "turkey", "bacon", "sausage", "steak", "veal",
            "ham", "duck", "prosciutto", "salami", "pepperoni", "ground meat", "mince", "salmon",
            "tuna", "cod", "tilapia", "halibut", "shrimp", "prawn", "crab", "lobster",
            "scallop", "mussel", "clam", "oyster", "anchov", "fish",
        ],
    ),
    (
        GroceryCategory::DairyEggs,
        &[
            "milk", "cheese", "butter", "cream", "yogurt", "yoghurt", "egg", "parmesan",
            "mozzarella", "cheddar", "ricotta", "feta", "ghee", "half-and-half",
            "half and half", "kefir",
        ],
    ),
    (
        GroceryCategory::Bakery,
        &[
            "bread", "bagel", "baguette", "croissant", "tortilla", "pita", "muffin",
            "brioche", "ciabatta", "sourdough", "dinner rolls", "buns", "cake", "donut",
            "doughnut", "pastry", "pie crust",
        ],
    ),
    (
        GroceryCategory::Pantry,
        &[
            "flour", "sugar", "rice", "pasta", "spaghetti", "noodle", "macaroni", "oats",
            "oatmeal", "cereal", "quinoa", "couscous", "lentil", "chickpea", "beans",
            "canned", "oil", "vinegar", "honey", "syrup", "soy sauce", "ketchup", "mustard",
            "mayonnaise", "mayo", "sauce", "broth", "stock", "baking soda", "baking powder",
            "yeast", "cornstarch", "cocoa", "chocolate", "peanut", "almond", "walnut",
            "pecan", "cashew", "nuts", "cracker", "chips", "jam", "jelly",
        ],
    ),
    (
        GroceryCategory::Frozen,
        &[
            "frozen", "ice cubes", "sorbet", "sherbet", "gelato", "popsicle", "ice pop",
            "tater tots",
        ],
    ),
    (
        GroceryCategory::Beverages,
        &[
            "water", "juice", "coffee", "espresso", "tea", "soda", "cola", "lemonade", "wine",
            "beer", "sparkling", "kombucha", "seltzer", "tonic", "vodka", "whiskey",
            "bourbon", "brandy",
        ],
    ),
    (
        GroceryCategory::SpicesSeasonings,
        &[
            "salt", "pepper", "cumin", "paprika", "cinnamon", "nutmeg", "oregano", "thyme",
            "rosemary", "sage", "turmeric", "curry", "chili powder", "chili flakes",
            "cayenne", "clove", "bay lea", "coriander", "cardamom", "vanilla", "seasoning",
            "spice", "garam masala", "saffron", "fennel seed", "dill", "tarragon",
            "marjoram",
        ],
    ),
];

/// Phrases checked before the keyword table. Each one contains a short
/// keyword that would otherwise pick the wrong aisle ("pear" in "pearl
/// barley", "oil" in "aluminum foil", "ham" in "graham crackers").
static PHRASE_OVERRIDES: &[(&str, GroceryCategory)] = &[
    ("pearl barley", GroceryCategory::Pantry),
    ("pearl couscous", GroceryCategory::Pantry),
    ("graham cracker", GroceryCategory::Pantry),
    ("hamburger bun", GroceryCategory::Bakery),
    ("champagne", GroceryCategory::Beverages),
    ("foil", GroceryCategory::Other),
    ("toilet", GroceryCategory::Other),
    ("shampoo", GroceryCategory::Other),
];

/// Extra keywords marking an ingredient as a liquid for volume display
static LIQUID_KEYWORDS: &[&str] = &[
    "water", "milk", "broth", "stock", "oil", "vinegar", "juice", "cream", "sauce", "syrup",
    "wine",
];

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Find the category and the keyword that matched, if any
pub fn matched_keyword(name: &str) -> Option<(GroceryCategory, &'static str)> {
    let normalized = normalize(name);
    if normalized.is_empty() {
        return None;
    }

    if let Some((phrase, category)) = PHRASE_OVERRIDES
        .iter()
        .find(|(phrase, _)| normalized.contains(*phrase))
    {
        return Some((*category, *phrase));
    }

    CATEGORY_KEYWORDS.iter().find_map(|(category, keywords)| {
        keywords
            .iter()
            .find(|keyword| normalized.contains(*keyword))
            .map(|keyword| (*category, *keyword))
    })
}

/// Classify an ingredient name into a grocery category
///
/// Total: names matching no keyword (including the empty string) are `Other`.
pub fn classify(name: &str) -> GroceryCategory {
    match matched_keyword(name) {
        Some((category, keyword)) => {
            tracing::debug!(name, keyword, category = category.as_str(), "classified ingredient");
            category
        }
        None => GroceryCategory::Other,
    }
}

/// Whether an ingredient should be measured as a liquid
pub fn is_liquid(name: &str) -> bool {
    let normalized = normalize(name);
    if normalized.is_empty() {
        return false;
    }
    classify(&normalized) == GroceryCategory::Beverages
        || LIQUID_KEYWORDS.iter().any(|k| normalized.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_category_but_other() {
        for category in GroceryCategory::ALL {
            let present = CATEGORY_KEYWORDS.iter().any(|(c, _)| *c == category);
            assert_eq!(present, category != GroceryCategory::Other, "{}", category);
        }
    }

    #[test]
    fn test_keywords_are_normalized() {
        for (_, keywords) in CATEGORY_KEYWORDS {
            for keyword in *keywords {
                assert_eq!(*keyword, keyword.trim().to_lowercase());
            }
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("MILK"), GroceryCategory::DairyEggs);
        assert_eq!(classify("milk"), GroceryCategory::DairyEggs);
        assert_eq!(classify("Milk"), GroceryCategory::DairyEggs);
    }

    #[test]
    fn test_substring_matching() {
        assert_eq!(classify("chicken broth"), GroceryCategory::MeatSeafood);
        assert_eq!(classify("Tomatoes"), GroceryCategory::Produce);
        assert_eq!(classify("sourdough bread"), GroceryCategory::Bakery);
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(classify("  Extra Virgin Olive Oil  "), GroceryCategory::Pantry);
    }

    #[test]
    fn test_priority_order() {
        // Produce is checked before Dairy & Eggs
        assert_eq!(classify("eggplant"), GroceryCategory::Produce);
        assert_eq!(classify("eggs"), GroceryCategory::DairyEggs);
        // Produce is checked before Beverages
        assert_eq!(classify("orange juice"), GroceryCategory::Produce);
        // Dairy & Eggs is checked before Frozen
        assert_eq!(classify("vanilla ice cream"), GroceryCategory::DairyEggs);
        // Meat & Seafood is checked before Beverages ("steak" contains "tea")
        assert_eq!(classify("flank steak"), GroceryCategory::MeatSeafood);
        assert_eq!(classify("red bell pepper"), GroceryCategory::Produce);
        assert_eq!(classify("black pepper"), GroceryCategory::SpicesSeasonings);
    }

    #[test]
    fn test_each_category_reachable() {
        assert_eq!(classify("frozen peas"), GroceryCategory::Frozen);
        assert_eq!(classify("sparkling water"), GroceryCategory::Beverages);
        assert_eq!(classify("ground cinnamon"), GroceryCategory::SpicesSeasonings);
        assert_eq!(classify("basmati rice"), GroceryCategory::Pantry);
    }

    #[test]
    fn test_fallback_to_other() {
        assert_eq!(classify(""), GroceryCategory::Other);
        assert_eq!(classify("   "), GroceryCategory::Other);
        assert_eq!(classify("paper towels"), GroceryCategory::Other);
        assert_eq!(classify("dish soap"), GroceryCategory::Other);
    }

    #[test]
    fn test_ham_is_meat() {
        assert_eq!(classify("ham"), GroceryCategory::MeatSeafood);
        assert_eq!(classify("Honey Ham"), GroceryCategory::MeatSeafood);
        assert_eq!(classify("smoked ham hock"), GroceryCategory::MeatSeafood);
    }

    #[test]
    fn test_phrases_shadowing_short_keywords() {
        assert_eq!(classify("pearl barley"), GroceryCategory::Pantry);
        assert_eq!(classify("aluminum foil"), GroceryCategory::Other);
        assert_eq!(classify("toilet paper"), GroceryCategory::Other);
        assert_eq!(classify("graham crackers"), GroceryCategory::Pantry);
        assert_eq!(classify("hamburger buns"), GroceryCategory::Bakery);
        assert_eq!(classify("champagne"), GroceryCategory::Beverages);
        assert_eq!(matched_keyword("Aluminum Foil"), Some((GroceryCategory::Other, "foil")));
        // The short keywords still match on their own
        assert_eq!(classify("pears"), GroceryCategory::Produce);
        assert_eq!(classify("olive oil"), GroceryCategory::Pantry);
    }

    #[test]
    fn test_override_phrases_are_normalized() {
        for (phrase, _) in PHRASE_OVERRIDES {
            assert_eq!(*phrase, phrase.trim().to_lowercase());
        }
    }

    #[test]
    fn test_matched_keyword_reports_match() {
        assert_eq!(
            matched_keyword("Chicken Thighs"),
            Some((GroceryCategory::MeatSeafood, "chicken"))
        );
        assert_eq!(matched_keyword("paper towels"), None);
    }

    #[test]
    fn test_is_liquid() {
        assert!(is_liquid("whole milk"));
        assert!(is_liquid("chicken stock"));
        assert!(is_liquid("cold brew coffee"));
        assert!(!is_liquid("all-purpose flour"));
        assert!(!is_liquid(""));
    }
}
