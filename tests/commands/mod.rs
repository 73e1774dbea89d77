mod test_cleanup;
mod test_clone;
