use crate::audio::track::{Track, TrackId, TrackStatus};
use crate::events::TrackView;

/// Step `offset` places from `index` in a ring of `len` entries.
///
/// Negative offsets wrap from the front to the back, so the result is always
/// in `0..len`. `len` must be non-zero.
pub fn wrap_index(index: usize, offset: isize, len: usize) -> usize {
    let len = len as isize;
    (index as isize + offset).rem_euclid(len) as usize
}

/// Ordered tracks plus a non-owning reference to the active one.
#[derive(Default)]
pub struct Playlist {
    tracks: Vec<Box<dyn Track>>,
    active: Option<TrackId>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, track: Box<dyn Track>) -> TrackId {
        let id = track.id();
        self.tracks.push(track);
        id
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn position(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id() == id)
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.position(id).is_some()
    }

    pub fn id_at(&self, index: usize) -> Option<TrackId> {
        self.tracks.get(index).map(|t| t.id())
    }

    pub fn get(&self, id: TrackId) -> Option<&dyn Track> {
        self.tracks
            .iter()
            .find(|t| t.id() == id)
            .map(|t| &**t)
    }

    pub fn get_mut(&mut self, id: TrackId) -> Option<&mut (dyn Track + 'static)> {
        self.tracks
            .iter_mut()
            .find(|t| t.id() == id)
            .map(|t| &mut **t)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Track + 'static)> {
        self.tracks.iter().map(|t| &**t)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Track>> {
        self.tracks.iter_mut()
    }

    pub fn active_id(&self) -> Option<TrackId> {
        self.active
    }

    pub fn active(&self) -> Option<&dyn Track> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut (dyn Track + 'static)> {
        let id = self.active?;
        self.get_mut(id)
    }

    pub fn set_active(&mut self, id: Option<TrackId>) {
        self.active = id;
    }

    /// The track `offset` places away from the active one, wrapping at both
    /// ends.
    pub fn neighbour(&self, offset: isize) -> Option<TrackId> {
        let current = self.position(self.active?)?;
        self.id_at(wrap_index(current, offset, self.len()))
    }

    pub fn shuffle(&mut self) {
        log::info!("Jukebox is shuffling");
    }

    pub fn views(&self) -> Vec<TrackView> {
        self.tracks
            .iter()
            .map(|track| {
                let meta = track.render_descriptor();
                let status = track.status();
                TrackView {
                    id: track.id(),
                    title: meta.title,
                    artist: meta.artist,
                    is_active: Some(track.id()) == self.active,
                    is_ready: status == TrackStatus::Ready,
                    error: match status {
                        TrackStatus::Failed(message) => Some(message),
                        _ => None,
                    },
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::player::VirtualPlayerFactory;
    use crate::audio::track::{LocalTrack, TrackMetadata};
    use proptest::prelude::*;

    fn playlist_of(titles: &[&str]) -> (Playlist, Vec<TrackId>) {
        let mut playlist = Playlist::new();
        let ids: Vec<TrackId> = titles
            .iter()
            .map(|title| {
                let meta = TrackMetadata::new(title, "Artist");
                let track = LocalTrack::new(title, Some(meta), &VirtualPlayerFactory).unwrap();
                playlist.push(Box::new(track))
            })
            .collect();
        (playlist, ids)
    }

    #[test]
    fn wrap_index_handles_both_ends() {
        assert_eq!(wrap_index(2, 1, 3), 0);
        assert_eq!(wrap_index(0, -1, 3), 2);
        assert_eq!(wrap_index(1, 1, 3), 2);
        assert_eq!(wrap_index(0, -1, 1), 0);
    }

    #[test]
    fn neighbour_follows_the_active_track() {
        let (mut playlist, ids) = playlist_of(&["A", "B", "C"]);
        assert_eq!(playlist.neighbour(1), None);

        playlist.set_active(Some(ids[1]));
        assert_eq!(playlist.neighbour(1), Some(ids[2]));
        assert_eq!(playlist.neighbour(-1), Some(ids[0]));

        playlist.set_active(Some(ids[0]));
        assert_eq!(playlist.neighbour(-1), Some(ids[2]));
    }

    #[test]
    fn duplicate_locators_are_distinct_entries() {
        let (playlist, ids) = playlist_of(&["A", "A"]);
        assert_eq!(playlist.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(playlist.position(ids[1]), Some(1));
    }

    #[test]
    fn views_mark_only_the_active_track() {
        let (mut playlist, ids) = playlist_of(&["A", "B", "C"]);
        playlist.set_active(Some(ids[2]));

        let views = playlist.views();
        assert_eq!(views.len(), 3);
        assert_eq!(views.iter().filter(|v| v.is_active).count(), 1);
        assert!(views[2].is_active);
        assert_eq!(views[0].title, "A");
        assert!(views.iter().all(|v| v.is_ready && v.error.is_none()));
    }

    #[test]
    fn shuffle_keeps_order() {
        let (mut playlist, ids) = playlist_of(&["A", "B", "C"]);
        playlist.shuffle();
        let after: Vec<_> = playlist.iter().map(|t| t.id()).collect();
        assert_eq!(after, ids);
    }

    proptest! {
        #[test]
        fn wrap_index_stays_in_range(len in 1usize..64, index in 0usize..64, forward in any::<bool>()) {
            let index = index % len;
            let offset = if forward { 1 } else { -1 };
            prop_assert!(wrap_index(index, offset, len) < len);
        }

        #[test]
        fn stepping_len_times_returns_home(len in 1usize..32, start in 0usize..32, forward in any::<bool>()) {
            let start = start % len;
            let offset = if forward { 1 } else { -1 };
            let mut index = start;
            for _ in 0..len {
                index = wrap_index(index, offset, len);
            }
            prop_assert_eq!(index, start);
        }
    }
}
