pub mod match_workflow;
