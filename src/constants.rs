pub const RECIPE_COUNT_PER_PAGE: i64 = 6;

pub const MAX_LENGTH_PASSWORD: usize = 150;
pub const MAX_LENGTH_TEXT_USERS: usize = 150;
pub const MAX_LENGTH_TEXT_RECIPES: usize = 200;
pub const MAX_LENGTH_EMAIL: usize = 254;
pub const MAX_LENGTH_COLOR: usize = 7;

pub const MIN_COOKING_TIME: i32 = 1;
pub const MIN_INGREDIENT_AMOUNT: i32 = 1;

pub const SESSION_COOKIE: &str = "session";
pub const DEFAULT_SESSION_SECRET: &str = "secret";
pub const SESSION_LIFETIME_HOURS: i64 = 1;

pub const SHOPPING_LIST_FILENAME: &str = "ShoppingList.txt";

pub const USERNAME_SYMBOLS: &[char] = &['_', '.', '@', '+', '-'];
pub const SLUG_SYMBOLS: &[char] = &['-', '_'];
