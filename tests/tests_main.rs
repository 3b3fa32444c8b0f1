#[path = "helpers/mod.rs"]
mod helpers;

#[path = "parser/mod.rs"]
mod parser;

#[path = "expression/mod.rs"]
mod expression;

#[path = "syntax/mod.rs"]
mod syntax;

#[path = "semantic/mod.rs"]
mod semantic;
