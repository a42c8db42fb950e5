use std::sync::Arc;

use bson::{doc, DateTime, Document};

use crate::{
	model::{Interaction, InteractionType, NewInteraction, Target, TargetKind},
	pagination::Paginator,
	store::{Collection, Store},
};

use super::{by_id, CommentRepository, Counted, Error, PostRepository, Records};

/// The result of [`InteractionRepository::upsert`].
#[derive(Debug, Clone)]
pub enum Upserted {
	/// No interaction existed for the user and target, so one was created.
	Created(Interaction),
	/// An interaction of the same type already existed.
	Unchanged(Interaction),
	/// The existing interaction had a different type and was re-typed.
	Retyped {
		interaction: Interaction,
		previous: InteractionType,
	},
}

impl Upserted {
	pub fn into_interaction(self) -> Interaction {
		match self {
			Self::Created(interaction)
			| Self::Unchanged(interaction)
			| Self::Retyped { interaction, .. } => interaction,
		}
	}
}

/// Interactions, keeping the counters on their targets in step.
///
/// Each lifecycle event issues one atomic increment per affected counter on
/// the target, routed by [`TargetKind`].
#[derive(Clone)]
pub struct InteractionRepository {
	records: Records<Interaction>,
	posts: PostRepository,
	comments: CommentRepository,
}

impl InteractionRepository {
	pub fn new(store: Arc<dyn Store>, posts: PostRepository, comments: CommentRepository) -> Self {
		Self {
			records: Records::new(store, Collection::Interactions),
			posts,
			comments,
		}
	}

	fn counted(&self, kind: TargetKind) -> &dyn Counted {
		match kind {
			TargetKind::Post => &self.posts,
			TargetKind::Comment => &self.comments,
		}
	}

	/// Adds `delta` to the counter tracking `kind` on `target`. Types without
	/// a counter are ignored.
	async fn adjust(&self, target: Target, kind: InteractionType, delta: i64) -> Result<(), Error> {
		let Some(field) = kind.counter_field() else {
			return Ok(());
		};

		self.counted(target.kind)
			.increment_count(by_id(target.id), field, delta)
			.await
	}

	/// Inserts the interaction, then increments the matching counter on its
	/// target.
	///
	/// Fails with [`Error::DuplicateKey`] if the user already holds an
	/// interaction of this type on the target.
	pub async fn create(&self, interaction: NewInteraction) -> Result<Interaction, Error> {
		let interaction = interaction.into_interaction(DateTime::now());

		self.records.insert(&interaction).await?;
		self.adjust(interaction.target(), interaction.kind, 1).await?;

		tracing::debug!(
			interaction = %interaction.id,
			target = %interaction.target,
			kind = interaction.kind.as_str(),
			"created interaction"
		);

		Ok(interaction)
	}

	pub async fn find_one(&self, filter: Document) -> Result<Option<Interaction>, Error> {
		self.records.find_one(filter).await
	}

	/// Newest first.
	pub async fn find_all(
		&self,
		filter: Document,
		paginator: Paginator,
	) -> Result<Vec<Interaction>, Error> {
		self.records.find_all(filter, paginator, true).await
	}

	/// Removes the first interaction matching `filter` and decrements the
	/// matching counter on its target. Returns the removed interaction.
	///
	/// The decrement is only issued if this call removed the record.
	pub async fn delete(&self, filter: Document) -> Result<Option<Interaction>, Error> {
		let Some(interaction) = self.records.find_one(filter).await? else {
			return Ok(None);
		};

		if self.records.remove(by_id(interaction.id)).await? == 0 {
			return Ok(None);
		}

		self.adjust(interaction.target(), interaction.kind, -1).await?;

		tracing::debug!(
			interaction = %interaction.id,
			target = %interaction.target,
			kind = interaction.kind.as_str(),
			"deleted interaction"
		);

		Ok(Some(interaction))
	}

	/// Creates the user's interaction with the target, or converts their
	/// existing one to the new type.
	///
	/// Calling this again with the same type changes nothing. Re-typing
	/// decrements the counter of the old type and increments the counter of
	/// the new one, as two separate writes.
	///
	/// If another call re-types the interaction first, it is returned as it
	/// now stands, unchanged by this call. If another call removes it first,
	/// a new one is created.
	pub async fn upsert(&self, interaction: NewInteraction) -> Result<Upserted, Error> {
		let owner = interaction.owner_filter();

		let Some(existing) = self.records.find_one(owner).await? else {
			return self.create(interaction).await.map(Upserted::Created);
		};

		if existing.kind == interaction.kind {
			return Ok(Upserted::Unchanged(existing));
		}

		let now = DateTime::now();
		let mut guard = by_id(existing.id);

		guard.insert("type", existing.kind.as_str());

		let matched = self
			.records
			.set(
				guard,
				doc! { "type": interaction.kind.as_str(), "updatedAt": now },
			)
			.await?;

		// Re-typed or removed since it was read, so its counters belong to
		// whichever call did that.
		if matched == 0 {
			tracing::debug!(interaction = %existing.id, "interaction changed concurrently");

			return match self.records.find_one(by_id(existing.id)).await? {
				Some(current) => Ok(Upserted::Unchanged(current)),
				None => self.create(interaction).await.map(Upserted::Created),
			};
		}

		self.adjust(existing.target(), existing.kind, -1).await?;
		self.adjust(interaction.target, interaction.kind, 1).await?;

		let previous = existing.kind;
		let interaction = Interaction {
			kind: interaction.kind,
			updated_at: now,
			..existing
		};

		Ok(Upserted::Retyped {
			interaction,
			previous,
		})
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	fn like(user: Uuid, target: Target) -> NewInteraction {
		NewInteraction {
			user,
			target,
			kind: InteractionType::Like,
		}
	}

	fn dislike(user: Uuid, target: Target) -> NewInteraction {
		NewInteraction {
			user,
			target,
			kind: InteractionType::Dislike,
		}
	}

	#[tokio::test]
	async fn test_like_retype_delete_scenario() {
		let repositories = repositories();
		let u1 = user(&repositories, "ada").await;
		let p = post(&repositories, u1.id).await;
		let target = Target::post(p.id);

		let liked = repositories
			.interactions
			.create(like(u1.id, target))
			.await
			.unwrap();

		assert_eq!(reload_post(&repositories, p.id).await.likes_count, 1);

		let upserted = repositories
			.interactions
			.upsert(dislike(u1.id, target))
			.await
			.unwrap();

		assert!(matches!(
			upserted,
			Upserted::Retyped {
				previous: InteractionType::Like,
				..
			}
		));
		let retyped = upserted.into_interaction();

		assert_eq!(retyped.id, liked.id);
		assert_eq!(retyped.kind, InteractionType::Dislike);

		let post = reload_post(&repositories, p.id).await;

		assert_eq!(post.likes_count, 0);
		assert_eq!(post.dislikes_count, 1);

		let records = repositories
			.interactions
			.find_all(
				{
					let mut filter = target.filter();
					filter.insert("user", id(u1.id));
					filter
				},
				Paginator::default(),
			)
			.await
			.unwrap();

		assert_eq!(records.len(), 1);

		let removed = repositories
			.interactions
			.delete(by_id(liked.id))
			.await
			.unwrap();

		assert_eq!(removed.map(|i| i.kind), Some(InteractionType::Dislike));

		let post = reload_post(&repositories, p.id).await;

		assert_eq!(post.likes_count, 0);
		assert_eq!(post.dislikes_count, 0);
	}

	#[tokio::test]
	async fn test_upsert_is_idempotent() {
		let repositories = repositories();
		let u1 = user(&repositories, "ada").await;
		let p = post(&repositories, u1.id).await;
		let target = Target::post(p.id);

		let first = repositories
			.interactions
			.upsert(like(u1.id, target))
			.await
			.unwrap();
		let second = repositories
			.interactions
			.upsert(like(u1.id, target))
			.await
			.unwrap();

		assert!(matches!(first, Upserted::Created(..)));
		assert!(matches!(second, Upserted::Unchanged(..)));

		let (first, second) = (first.into_interaction(), second.into_interaction());

		assert_eq!(first.id, second.id);
		assert_eq!(first.updated_at, second.updated_at);

		let post = reload_post(&repositories, p.id).await;

		assert_eq!(post.likes_count, 1);
		assert_eq!(post.dislikes_count, 0);
	}

	#[tokio::test]
	async fn test_create_duplicate_type_is_rejected() {
		let repositories = repositories();
		let u1 = user(&repositories, "ada").await;
		let p = post(&repositories, u1.id).await;
		let target = Target::post(p.id);

		repositories
			.interactions
			.create(like(u1.id, target))
			.await
			.unwrap();

		let result = repositories.interactions.create(like(u1.id, target)).await;

		assert!(matches!(result, Err(Error::DuplicateKey { .. })));
		assert_eq!(reload_post(&repositories, p.id).await.likes_count, 1);
	}

	#[tokio::test]
	async fn test_comment_targets_use_comment_counters() {
		let repositories = repositories();
		let u1 = user(&repositories, "ada").await;
		let u2 = user(&repositories, "bob").await;
		let p = post(&repositories, u1.id).await;
		let c = comment(&repositories, u1.id, p.id, None).await;
		let target = Target::comment(c.id);

		repositories
			.interactions
			.create(like(u1.id, target))
			.await
			.unwrap();
		repositories
			.interactions
			.upsert(dislike(u2.id, target))
			.await
			.unwrap();

		let found = repositories
			.comments
			.find_one(by_id(c.id))
			.await
			.unwrap()
			.unwrap();

		assert_eq!(found.likes_count, 1);
		assert_eq!(found.dislikes_count, 1);

		let post = reload_post(&repositories, p.id).await;

		assert_eq!(post.likes_count, 0);
		assert_eq!(post.dislikes_count, 0);
		assert_eq!(post.comments_count, 1);
	}

	#[tokio::test]
	async fn test_views_are_counted() {
		let repositories = repositories();
		let u1 = user(&repositories, "ada").await;
		let u2 = user(&repositories, "bob").await;
		let p = post(&repositories, u1.id).await;

		for viewer in [u1.id, u2.id] {
			repositories
				.interactions
				.upsert(NewInteraction {
					user: viewer,
					target: Target::post(p.id),
					kind: InteractionType::View,
				})
				.await
				.unwrap();
		}

		assert_eq!(reload_post(&repositories, p.id).await.views_count, 2);
	}

	#[tokio::test]
	async fn test_other_type_touches_no_counter() {
		let repositories = repositories();
		let u1 = user(&repositories, "ada").await;
		let p = post(&repositories, u1.id).await;

		let interaction = repositories
			.interactions
			.create(NewInteraction {
				user: u1.id,
				target: Target::post(p.id),
				kind: InteractionType::Other,
			})
			.await
			.unwrap();

		repositories
			.interactions
			.delete(by_id(interaction.id))
			.await
			.unwrap();

		let post = reload_post(&repositories, p.id).await;

		assert_eq!(post.views_count, 0);
		assert_eq!(post.likes_count, 0);
		assert_eq!(post.dislikes_count, 0);
	}

	#[tokio::test]
	async fn test_delete_missing_is_noop() {
		let repositories = repositories();
		let u1 = user(&repositories, "ada").await;
		let p = post(&repositories, u1.id).await;

		let removed = repositories
			.interactions
			.delete(Target::post(p.id).filter())
			.await
			.unwrap();

		assert!(removed.is_none());
		assert_eq!(reload_post(&repositories, p.id).await.likes_count, 0);
	}

	async fn counters(repositories: &Repositories, post: Uuid) -> [i64; 3] {
		let post = reload_post(repositories, post).await;

		[post.views_count, post.likes_count, post.dislikes_count]
	}

	#[tokio::test]
	async fn test_upsert_after_concurrent_retype() {
		let (repositories, store) = racing_repositories();
		let u1 = user(&repositories, "ada").await;
		let p = post(&repositories, u1.id).await;
		let target = Target::post(p.id);

		let liked = repositories
			.interactions
			.create(like(u1.id, target))
			.await
			.unwrap();

		store.arm(Race::Retype(InteractionType::View));

		let upserted = repositories
			.interactions
			.upsert(dislike(u1.id, target))
			.await
			.unwrap();

		assert!(matches!(upserted, Upserted::Unchanged(..)));

		let current = upserted.into_interaction();

		assert_eq!(current.id, liked.id);
		assert_eq!(current.kind, InteractionType::View);
		assert_eq!(counters(&repositories, p.id).await, [0, 1, 0]);
	}

	#[tokio::test]
	async fn test_upsert_after_concurrent_remove() {
		let (repositories, store) = racing_repositories();
		let u1 = user(&repositories, "ada").await;
		let p = post(&repositories, u1.id).await;
		let target = Target::post(p.id);

		let liked = repositories
			.interactions
			.create(like(u1.id, target))
			.await
			.unwrap();

		store.arm(Race::Remove);

		let upserted = repositories
			.interactions
			.upsert(dislike(u1.id, target))
			.await
			.unwrap();

		assert!(matches!(upserted, Upserted::Created(..)));

		let created = upserted.into_interaction();

		assert_ne!(created.id, liked.id);
		assert_eq!(created.kind, InteractionType::Dislike);
		// The like's decrement belongs to whoever removed it.
		assert_eq!(counters(&repositories, p.id).await, [0, 1, 1]);
	}

	#[tokio::test]
	async fn test_delete_after_concurrent_remove() {
		let (repositories, store) = racing_repositories();
		let u1 = user(&repositories, "ada").await;
		let p = post(&repositories, u1.id).await;
		let target = Target::post(p.id);

		repositories
			.interactions
			.create(like(u1.id, target))
			.await
			.unwrap();

		store.arm(Race::Remove);

		let removed = repositories
			.interactions
			.delete(like(u1.id, target).owner_filter())
			.await
			.unwrap();

		assert!(removed.is_none());
		assert_eq!(counters(&repositories, p.id).await, [0, 1, 0]);
		assert!(repositories
			.interactions
			.find_one(target.filter())
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn test_counters_track_live_interactions() {
		let repositories = repositories();
		let author = user(&repositories, "ada").await;
		let p = post(&repositories, author.id).await;
		let target = Target::post(p.id);

		let mut users = Vec::new();

		for name in ["u1", "u2", "u3", "u4"] {
			users.push(user(&repositories, name).await.id);
		}

		let events = [
			(0, Some(InteractionType::Like)),
			(1, Some(InteractionType::Like)),
			(2, Some(InteractionType::Dislike)),
			(0, Some(InteractionType::Dislike)),
			(3, Some(InteractionType::Like)),
			(1, None),
			(2, Some(InteractionType::Like)),
			(3, Some(InteractionType::Like)),
			(0, None),
		];

		for (user, kind) in events {
			let user = users[user];

			match kind {
				Some(kind) => {
					repositories
						.interactions
						.upsert(NewInteraction { user, target, kind })
						.await
						.unwrap();
				}
				None => {
					let mut filter = target.filter();

					filter.insert("user", id(user));
					repositories.interactions.delete(filter).await.unwrap();
				}
			}
		}

		let live = repositories
			.interactions
			.find_all(target.filter(), Paginator::default())
			.await
			.unwrap();

		let count = |kind| live.iter().filter(|i| i.kind == kind).count() as i64;
		let post = reload_post(&repositories, p.id).await;

		assert_eq!(post.likes_count, count(InteractionType::Like));
		assert_eq!(post.dislikes_count, count(InteractionType::Dislike));
		assert_eq!(post.likes_count, 2);
		assert_eq!(post.dislikes_count, 0);
	}
}
