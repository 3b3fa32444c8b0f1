mod tests_signatures;
