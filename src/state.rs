use crate::commands::Command;
use crate::effects::{self, Effect};
use crate::reducers;
use crate::store::Store;

/// Owns the store and the pending command/effect queues. Components never
/// mutate the store directly; they dispatch commands and request effects,
/// which the shell flushes once per frame.
pub struct State {
    pub store: Store,
    command_queue: Vec<Command>,
    effect_queue: Vec<Effect>,
}

impl State {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            command_queue: Vec::new(),
            effect_queue: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        self.command_queue.push(command);
    }

    pub fn request(&mut self, effect: Effect) {
        self.effect_queue.push(effect);
    }

    pub fn flush_commands(&mut self) {
        let commands = std::mem::take(&mut self.command_queue);
        for command in commands {
            self.store.workbench =
                reducers::reduce(&self.store.workbench, &command);
        }
    }

    pub fn flush_effects(&mut self) {
        let effects = std::mem::take(&mut self.effect_queue);
        for effect in effects {
            effects::run(&mut self.store, effect);
        }
    }
}
