#![cfg(test)]

mod network;

mod scan {
    mod integration;
}
