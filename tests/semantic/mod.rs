mod tests_type_manager;
mod tests_validation;
