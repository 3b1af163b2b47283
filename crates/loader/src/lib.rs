use anyhow::{Context, Result};
use neo4rs::{Graph, Query};
use tracing::info;

use extract::Relationship;
use resolve::CanonicalEntity;

pub struct GraphLoader {
    graph: Graph,
}

#[derive(Debug, Clone, Copy)]
pub struct LoadReport {
    pub entities: usize,
    pub relationships: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct GraphStats {
    pub entity_count: usize,
    pub relationship_count: usize,
}

impl GraphLoader {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .with_context(|| format!("Failed to connect to Neo4j at {uri}"))?;
        Ok(Self::new(graph))
    }

    /// Create indexes on `Entity.id` and `Entity.name`.
    pub async fn init_schema(&self) -> Result<()> {
        let query = Query::new(
            "CREATE INDEX entity_id_index IF NOT EXISTS FOR (e:Entity) ON (e.id)".to_string(),
        );
        self.graph
            .run(query)
            .await
            .context("Failed to create index on Entity.id")?;

        let query = Query::new(
            "CREATE INDEX entity_name_index IF NOT EXISTS FOR (e:Entity) ON (e.name)".to_string(),
        );
        self.graph
            .run(query)
            .await
            .context("Failed to create index on Entity.name")?;

        info!("Neo4j indexes ready");
        Ok(())
    }

    /// Upsert one entity node. MERGE on id keeps reloads duplicate-free.
    pub async fn load_entity(&self, entity: &CanonicalEntity) -> Result<()> {
        // Neo4j properties are scalars; aliases travel as a JSON string.
        let aliases_json =
            serde_json::to_string(&entity.aliases).context("Failed to serialize aliases")?;

        let query = Query::new(
            r#"
            MERGE (e:Entity {id: $id})
            SET e.name = $name,
                e.type = $type,
                e.aliases = $aliases
            "#
            .to_string(),
        )
        .param("id", entity.id.clone())
        .param("name", entity.name.clone())
        .param(
            "type",
            entity
                .entity_type
                .clone()
                .unwrap_or_else(|| "UNKNOWN".to_string()),
        )
        .param("aliases", aliases_json);

        self.graph
            .run(query)
            .await
            .with_context(|| format!("Failed to load entity {}", entity.id))?;

        Ok(())
    }

    /// Upsert one relationship edge between existing entity nodes.
    pub async fn load_relationship(&self, relationship: &Relationship) -> Result<()> {
        // Endpoints should exist after load_entity; placeholders cover
        // relationships loaded on their own.
        self.ensure_entity(&relationship.source).await?;
        self.ensure_entity(&relationship.target).await?;

        let query = Query::new(
            r#"
            MATCH (source:Entity {id: $source_id})
            MATCH (target:Entity {id: $target_id})
            MERGE (source)-[r:RELATION {type: $relation}]->(target)
            SET r.evidence_span = $evidence_span
            "#
            .to_string(),
        )
        .param("source_id", relationship.source.clone())
        .param("target_id", relationship.target.clone())
        .param("relation", relationship.relation.clone())
        .param("evidence_span", relationship.evidence_span.clone());

        self.graph.run(query).await.with_context(|| {
            format!(
                "Failed to load relationship {} -{}-> {}",
                relationship.source, relationship.relation, relationship.target
            )
        })?;

        Ok(())
    }

    async fn ensure_entity(&self, entity_id: &str) -> Result<()> {
        let query = Query::new(
            r#"
            MERGE (e:Entity {id: $id})
            ON CREATE SET e.name = $id, e.type = 'UNKNOWN', e.aliases = '[]'
            "#
            .to_string(),
        )
        .param("id", entity_id.to_string());

        self.graph
            .run(query)
            .await
            .with_context(|| format!("Failed to ensure entity {entity_id} exists"))?;

        Ok(())
    }

    /// Load a resolved graph: entities first, then relationships.
    pub async fn load_graph(
        &self,
        entities: &[CanonicalEntity],
        relationships: &[Relationship],
    ) -> Result<LoadReport> {
        for entity in entities {
            self.load_entity(entity).await?;
        }
        for relationship in relationships {
            self.load_relationship(relationship).await?;
        }

        let report = LoadReport {
            entities: entities.len(),
            relationships: relationships.len(),
        };
        info!(
            entities = report.entities,
            relationships = report.relationships,
            "graph load complete"
        );
        Ok(report)
    }

    pub async fn stats(&self) -> Result<GraphStats> {
        let entity_query = Query::new("MATCH (e:Entity) RETURN count(e) as count".to_string());
        let mut result = self.graph.execute(entity_query).await?;
        let entity_count = if let Some(row) = result.next().await? {
            row.get::<i64>("count").unwrap_or(0) as usize
        } else {
            0
        };

        let relationship_query =
            Query::new("MATCH ()-[r:RELATION]->() RETURN count(r) as count".to_string());
        let mut result = self.graph.execute(relationship_query).await?;
        let relationship_count = if let Some(row) = result.next().await? {
            row.get::<i64>("count").unwrap_or(0) as usize
        } else {
            0
        };

        Ok(GraphStats {
            entity_count,
            relationship_count,
        })
    }
}
