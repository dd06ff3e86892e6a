mod integration;
mod scenarios;
