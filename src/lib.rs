#![cfg_attr(not(test), no_std)]

//! telemnode - Firmware core for a WiFi telemetry node
//!
//! This library provides the portable part of the node firmware: the WiFi
//! connection state machine, the buffered InfluxDB telemetry collector, the
//! checksummed settings persistence, and the RS-485 command bus. All hardware
//! access goes through the platform abstraction layer; board crates supply
//! concrete radio/HTTP/flash/serial backends.

// Platform abstraction layer (traits + mock implementations for host tests)
pub mod platform;

// Core infrastructure (logging, rotating log buffer, poll-loop scheduler)
pub mod core;

// Settings structs and checksummed flash persistence
pub mod parameters;

// WiFi connection management and the retained reconnect cache
pub mod network;

// Telemetry buffering, push engine, remote clock and query client
pub mod telemetry;

// RS-485 command protocol
pub mod communication;
