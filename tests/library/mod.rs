mod tests_containers;
mod tests_invalid_free;
mod tests_loading;
mod tests_parallel;
mod tests_queries;
mod tests_resolution;
