pub mod test_graph;
