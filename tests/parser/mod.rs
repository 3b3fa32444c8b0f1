mod tests_structure;
