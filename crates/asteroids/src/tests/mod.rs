//! Whole-session scenarios driven the way a host would drive them
