pub mod test_rewrite;
