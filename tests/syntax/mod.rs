mod tests_round_trip;
mod tests_traversal;
