//! Storage collaborator for the bracket engine.
//!
//! The engine only talks to [`BracketStore`]. Every resolution runs inside
//! [`BracketStore::transaction`], so an implementation must either commit all
//! writes made by the closure or none of them.

use bracket_core::*;
use std::collections::BTreeMap;

/// Ids handed out by [`InMemoryStore`] start here
pub const FIRST_ID: u64 = 10;

pub trait BracketStore {
    fn tournament(&self, id: TournamentId) -> Result<Tournament>;
    fn participant(&self, id: ParticipantId) -> Result<Participant>;
    fn battle(&self, id: BattleId) -> Result<Battle>;
    fn event_type(&self, id: EventTypeId) -> Result<EventType>;
    fn battle_event(&self, id: EventId) -> Result<BattleEvent>;

    /// Overwrite an existing record. Unknown ids are `NotFound`.
    fn save_tournament(&mut self, tournament: Tournament) -> Result<Tournament>;
    fn save_participant(&mut self, participant: Participant) -> Result<Participant>;
    fn save_battle(&mut self, battle: Battle) -> Result<Battle>;
    fn save_battle_event(&mut self, event: BattleEvent) -> Result<BattleEvent>;

    /// Insert a new record under a fresh id; the id on the argument is ignored.
    fn create_tournament(&mut self, tournament: Tournament) -> Result<Tournament>;
    fn create_participant(&mut self, participant: Participant) -> Result<Participant>;
    fn create_battle(&mut self, battle: Battle) -> Result<Battle>;
    fn create_event_type(&mut self, event_type: EventType) -> Result<EventType>;
    fn create_battle_event(&mut self, event: BattleEvent) -> Result<BattleEvent>;

    fn find_battle_by_number(
        &self,
        battle_number: u32,
        tournament: TournamentId,
    ) -> Result<Option<Battle>>;
    fn count_participants(&self, tournament: TournamentId) -> Result<u32>;

    fn battles_in(&self, tournament: TournamentId) -> Result<Vec<Battle>>;
    fn participants_in(&self, tournament: TournamentId) -> Result<Vec<Participant>>;
    fn battle_events(&self) -> Result<Vec<BattleEvent>>;

    /// Run `f` atomically: if it returns `Err`, none of its writes remain.
    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T>;

    /// Battles of a tournament in bracket order
    fn bracket(&self, tournament: TournamentId) -> Result<Vec<Battle>> {
        self.tournament(tournament)?;
        let mut battles = self.battles_in(tournament)?;
        battles.sort_by_key(|b| b.battle_number);
        Ok(battles)
    }

    /// Participants by score, best first; ties keep id order
    fn standings(&self, tournament: TournamentId) -> Result<Vec<Participant>> {
        self.tournament(tournament)?;
        let mut participants = self.participants_in(tournament)?;
        participants.sort_by(|a, b| b.score().cmp(&a.score()).then(a.id.cmp(&b.id)));
        Ok(participants)
    }

    fn events_for(
        &self,
        battle: BattleId,
        participant: ParticipantId,
    ) -> Result<Vec<BattleEvent>> {
        self.battle(battle)?;
        self.participant(participant)?;
        Ok(self
            .battle_events()?
            .into_iter()
            .filter(|e| e.battle == battle && e.participant == participant)
            .collect())
    }

    fn events_for_participant(&self, participant: ParticipantId) -> Result<Vec<BattleEvent>> {
        self.participant(participant)?;
        Ok(self
            .battle_events()?
            .into_iter()
            .filter(|e| e.participant == participant)
            .collect())
    }
}

/// Single-writer store backed by ordered maps.
///
/// Transactions snapshot the whole store and restore it on failure, which is
/// fine for the bracket sizes this engine deals with.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    next_id: u64,
    tournaments: BTreeMap<TournamentId, Tournament>,
    participants: BTreeMap<ParticipantId, Participant>,
    battles: BTreeMap<BattleId, Battle>,
    event_types: BTreeMap<EventTypeId, EventType>,
    battle_events: BTreeMap<EventId, BattleEvent>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: FIRST_ID,
            tournaments: BTreeMap::new(),
            participants: BTreeMap::new(),
            battles: BTreeMap::new(),
            event_types: BTreeMap::new(),
            battle_events: BTreeMap::new(),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn fetch<K: Ord + Copy + ToString, V: Clone>(
    map: &BTreeMap<K, V>,
    kind: &'static str,
    id: K,
) -> Result<V> {
    map.get(&id)
        .cloned()
        .ok_or_else(|| BracketError::not_found(kind, id))
}

fn overwrite<K: Ord + Copy + ToString, V: Clone>(
    map: &mut BTreeMap<K, V>,
    kind: &'static str,
    id: K,
    value: V,
) -> Result<V> {
    match map.get_mut(&id) {
        Some(slot) => {
            *slot = value.clone();
            Ok(value)
        }
        None => Err(BracketError::not_found(kind, id)),
    }
}

impl BracketStore for InMemoryStore {
    fn tournament(&self, id: TournamentId) -> Result<Tournament> {
        fetch(&self.tournaments, "tournament", id)
    }

    fn participant(&self, id: ParticipantId) -> Result<Participant> {
        fetch(&self.participants, "participant", id)
    }

    fn battle(&self, id: BattleId) -> Result<Battle> {
        fetch(&self.battles, "battle", id)
    }

    fn event_type(&self, id: EventTypeId) -> Result<EventType> {
        fetch(&self.event_types, "event type", id)
    }

    fn battle_event(&self, id: EventId) -> Result<BattleEvent> {
        fetch(&self.battle_events, "battle event", id)
    }

    fn save_tournament(&mut self, tournament: Tournament) -> Result<Tournament> {
        overwrite(&mut self.tournaments, "tournament", tournament.id, tournament)
    }

    fn save_participant(&mut self, participant: Participant) -> Result<Participant> {
        overwrite(
            &mut self.participants,
            "participant",
            participant.id,
            participant,
        )
    }

    fn save_battle(&mut self, battle: Battle) -> Result<Battle> {
        overwrite(&mut self.battles, "battle", battle.id, battle)
    }

    fn save_battle_event(&mut self, event: BattleEvent) -> Result<BattleEvent> {
        overwrite(&mut self.battle_events, "battle event", event.id, event)
    }

    fn create_tournament(&mut self, mut tournament: Tournament) -> Result<Tournament> {
        tournament.id = TournamentId(self.allocate_id());
        self.tournaments.insert(tournament.id, tournament.clone());
        Ok(tournament)
    }

    fn create_participant(&mut self, mut participant: Participant) -> Result<Participant> {
        self.tournament(participant.tournament)?;
        participant.id = ParticipantId(self.allocate_id());
        self.participants.insert(participant.id, participant.clone());
        Ok(participant)
    }

    fn create_battle(&mut self, mut battle: Battle) -> Result<Battle> {
        self.tournament(battle.tournament)?;
        if self
            .find_battle_by_number(battle.battle_number, battle.tournament)?
            .is_some()
        {
            return Err(BracketError::invalid_state(format!(
                "tournament {} already has a battle #{}",
                battle.tournament, battle.battle_number
            )));
        }
        battle.id = BattleId(self.allocate_id());
        self.battles.insert(battle.id, battle.clone());
        Ok(battle)
    }

    fn create_event_type(&mut self, mut event_type: EventType) -> Result<EventType> {
        event_type.id = EventTypeId(self.allocate_id());
        self.event_types.insert(event_type.id, event_type.clone());
        Ok(event_type)
    }

    fn create_battle_event(&mut self, mut event: BattleEvent) -> Result<BattleEvent> {
        event.id = EventId(self.allocate_id());
        self.battle_events.insert(event.id, event.clone());
        Ok(event)
    }

    fn find_battle_by_number(
        &self,
        battle_number: u32,
        tournament: TournamentId,
    ) -> Result<Option<Battle>> {
        Ok(self
            .battles
            .values()
            .find(|b| b.tournament == tournament && b.battle_number == battle_number)
            .cloned())
    }

    fn count_participants(&self, tournament: TournamentId) -> Result<u32> {
        let count = self
            .participants
            .values()
            .filter(|p| p.tournament == tournament)
            .count();
        u32::try_from(count)
            .map_err(|_| BracketError::storage(format!("{} participants overflow u32", count)))
    }

    fn battles_in(&self, tournament: TournamentId) -> Result<Vec<Battle>> {
        Ok(self
            .battles
            .values()
            .filter(|b| b.tournament == tournament)
            .cloned()
            .collect())
    }

    fn participants_in(&self, tournament: TournamentId) -> Result<Vec<Participant>> {
        Ok(self
            .participants
            .values()
            .filter(|p| p.tournament == tournament)
            .cloned()
            .collect())
    }

    fn battle_events(&self) -> Result<Vec<BattleEvent>> {
        Ok(self.battle_events.values().cloned().collect())
    }

    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
