//! Tests for the token makers

mod rs256_tests;
