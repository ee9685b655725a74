/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes four top-level command modules:

- `console`  — Interactive console (chat, session management, board panel)
- `sessions` — One-shot session list/pin/rename/delete
- `board`    — One-shot knowledge board dump
- `profile`  — Identity profile get/set

These handlers are intentionally small and use the library components:
the remote store client, the session synchronizer, and the thread
controller.
*/

// Interactive console wiring
pub mod console;

// Special commands parser for the console
pub mod special_commands;

// One-shot session management
pub mod sessions;

// One-shot board dump
pub mod board;

// Identity profile handlers
pub mod profile;
