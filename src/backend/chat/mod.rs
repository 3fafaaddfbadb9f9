/**
 * Chat Data Access API
 *
 * The one-resource HTTP surface over the chat-room document.
 */

pub mod handlers;
