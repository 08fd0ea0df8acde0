//! Behavioural tests for the request pipeline.

mod behaviour;
