mod engine_flow;
