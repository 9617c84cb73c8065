pub mod test_rule;
