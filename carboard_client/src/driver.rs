//! Runs a `BoardSession` on a worker thread. The rendering layer sends
//! `SessionCommand`s and drains `SessionEvent`s from its frame loop; it
//! never touches the session state directly. Secrets arrive already
//! collected from the user, attached to the command that needs them.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::error;

use carboard_core::board::{
    BoardSession, BoardSnapshot, CategoryFilter, EntityKind, MutationOutcome, SortKey, VoteOutcome,
};
use carboard_core::models::{Comment, EditItemInput, Item, NewComment, NewItem};
use carboard_core::remote::RemoteStore;

pub enum SessionCommand {
    Load,
    SetSearchTerm(String),
    SetCategoryFilter(CategoryFilter),
    SetSortKey(SortKey),
    ApplyVote(String),
    CreateItem(NewItem),
    EditItem {
        id: String,
        edit: EditItemInput,
        secret: String,
    },
    DeleteItem {
        id: String,
        secret: String,
    },
    LoadComments(String),
    AddComment(NewComment),
    EditComment {
        id: String,
        content: String,
        secret: String,
    },
    DeleteComment {
        id: String,
        secret: String,
    },
    ResolveRepost(String),
    Shutdown,
}

pub enum SessionEvent {
    Snapshot(BoardSnapshot),
    LoadFailed(String),
    VoteFailed {
        item_id: String,
        message: String,
    },
    ItemCreated(Result<Item, String>),
    MutationFinished {
        entity: EntityKind,
        id: String,
        result: Result<MutationOutcome, String>,
    },
    CommentsLoaded {
        item_id: String,
        result: Result<Vec<Comment>, String>,
    },
    CommentCreated(Result<Comment, String>),
    RepostResolved {
        id: String,
        result: Result<Option<Item>, String>,
    },
}

pub struct SessionHandle {
    tx: Sender<SessionCommand>,
    join: JoinHandle<()>,
}

impl SessionHandle {
    pub fn send(&self, command: SessionCommand) {
        if self.tx.send(command).is_err() {
            error!("session worker is gone; command dropped");
        }
    }

    pub fn shutdown(self) {
        let _ = self.tx.send(SessionCommand::Shutdown);
        if self.join.join().is_err() {
            error!("session worker panicked during shutdown");
        }
    }
}

/// Spawns the session loop and hands back the command handle plus the
/// event receiver the UI drains.
pub fn spawn_session<S>(remote: S) -> (SessionHandle, Receiver<SessionEvent>)
where
    S: RemoteStore + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();
    let join = thread::spawn(move || {
        run_loop(BoardSession::new(remote), command_rx, event_tx);
    });
    (
        SessionHandle {
            tx: command_tx,
            join,
        },
        event_rx,
    )
}

fn run_loop<S: RemoteStore>(
    mut session: BoardSession<S>,
    commands: Receiver<SessionCommand>,
    events: Sender<SessionEvent>,
) {
    let emit = |event: SessionEvent| {
        if events.send(event).is_err() {
            error!("failed to send session event");
        }
    };

    while let Ok(command) = commands.recv() {
        match command {
            SessionCommand::Shutdown => break,
            SessionCommand::Load => {
                if let Err(err) = session.load() {
                    emit(SessionEvent::LoadFailed(err.to_string()));
                }
                emit(SessionEvent::Snapshot(session.snapshot()));
            }
            SessionCommand::SetSearchTerm(term) => {
                session.set_search_term(term);
                emit(SessionEvent::Snapshot(session.snapshot()));
            }
            SessionCommand::SetCategoryFilter(filter) => {
                session.set_category_filter(filter);
                emit(SessionEvent::Snapshot(session.snapshot()));
            }
            SessionCommand::SetSortKey(sort) => {
                session.set_sort_key(sort);
                emit(SessionEvent::Snapshot(session.snapshot()));
            }
            SessionCommand::ApplyVote(item_id) => {
                if let VoteOutcome::RolledBack(err) = session.apply_vote(&item_id) {
                    emit(SessionEvent::VoteFailed {
                        item_id,
                        message: err.to_string(),
                    });
                }
                emit(SessionEvent::Snapshot(session.snapshot()));
            }
            SessionCommand::CreateItem(input) => {
                let result = session.create_item(input).map_err(|err| err.to_string());
                emit(SessionEvent::ItemCreated(result));
                emit(SessionEvent::Snapshot(session.snapshot()));
            }
            SessionCommand::EditItem { id, edit, secret } => {
                let result = session
                    .edit_item(&id, edit, &secret)
                    .map_err(|err| err.to_string());
                emit(SessionEvent::MutationFinished {
                    entity: EntityKind::Item,
                    id,
                    result,
                });
                emit(SessionEvent::Snapshot(session.snapshot()));
            }
            SessionCommand::DeleteItem { id, secret } => {
                let result = session
                    .delete_item(&id, &secret)
                    .map_err(|err| err.to_string());
                emit(SessionEvent::MutationFinished {
                    entity: EntityKind::Item,
                    id,
                    result,
                });
                emit(SessionEvent::Snapshot(session.snapshot()));
            }
            SessionCommand::LoadComments(item_id) => {
                let result = session
                    .comments_for(&item_id)
                    .map_err(|err| err.to_string());
                emit(SessionEvent::CommentsLoaded { item_id, result });
            }
            SessionCommand::AddComment(input) => {
                let result = session.add_comment(input).map_err(|err| err.to_string());
                emit(SessionEvent::CommentCreated(result));
            }
            SessionCommand::EditComment {
                id,
                content,
                secret,
            } => {
                let result = session
                    .edit_comment(&id, &content, &secret)
                    .map_err(|err| err.to_string());
                emit(SessionEvent::MutationFinished {
                    entity: EntityKind::Comment,
                    id,
                    result,
                });
            }
            SessionCommand::DeleteComment { id, secret } => {
                let result = session
                    .delete_comment(&id, &secret)
                    .map_err(|err| err.to_string());
                emit(SessionEvent::MutationFinished {
                    entity: EntityKind::Comment,
                    id,
                    result,
                });
            }
            SessionCommand::ResolveRepost(id) => {
                let result = session
                    .resolve_repost(&id)
                    .map_err(|err| err.to_string());
                emit(SessionEvent::RepostResolved { id, result });
            }
        }
    }
}
