mod tests_deployment;
mod tests_import_cycles;
mod tests_literals;
mod tests_management_cycles;
mod tests_normalize;
mod tests_types;
