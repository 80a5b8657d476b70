mod tests_session;
mod tests_symbol_index;
