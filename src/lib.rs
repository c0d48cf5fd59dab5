//#![warn(missing_docs)]

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod clock;

pub mod hash;

pub mod name;

pub mod packet;

pub mod face;

pub mod faceset;

pub mod tables;

pub mod store;

pub mod metrics;

pub mod buffer;

pub mod redirect;

pub mod strategy;

pub mod consumer;

pub mod config;

pub mod platform;
